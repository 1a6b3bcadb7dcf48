use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid color: {0:?} (expected a 3 or 6 digit hex color)")]
    InvalidColor(String),

    #[error("incomplete gradient: {present} of 3 gradient values given (color1, color2, angle)")]
    IncompleteGradient { present: usize },

    #[error("{target} background given both as a solid color and as a gradient")]
    ConflictingBackground { target: &'static str },

    #[error("invalid {target} ratio {value} (expected a value in (0, 1])")]
    InvalidRatio { target: &'static str, value: f32 },

    #[error("project path is not a directory: {0}")]
    ProjectNotFound(PathBuf),

    #[error("no platform selected, nothing to do")]
    NoPlatformSelected,

    #[error("no answer for {0:?} and prompting is disabled")]
    MissingValue(String),

    #[error("prompt failed")]
    Prompt(#[source] std::io::Error),

    #[error("failed to read image {path}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write image {path}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to manage the temporary workspace")]
    Workspace(#[source] std::io::Error),

    #[error("resource generation failed")]
    Generator(#[source] anyhow::Error),
}
