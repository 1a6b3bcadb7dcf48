pub mod background;
pub mod color;
pub mod compose;
pub mod contents_json;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod prompts;
pub mod resources;

pub use error::{Error, Result};
