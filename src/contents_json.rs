//! Contents.json data model for Xcode asset catalogs
//!
//! Only the subset needed for an app icon set and a splash image set is modelled:
//! image entries with filename, idiom, size and scale, plus the info block.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

const AUTHOR: &str = "cap-resources";

/// Root structure of a Contents.json file
#[derive(Serialize, Debug, Clone)]
pub struct ContentsFile {
    /// Image entries for the different idioms, sizes and scales
    pub images: Vec<ImageEntry>,

    /// Versioning and authorship information
    pub info: Info,
}

/// Individual image entry within an asset catalog
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ImageEntry {
    /// File name relative to the asset set directory
    pub filename: String,

    /// The device type for the image (e.g. "universal", "iphone", "ipad", "ios-marketing")
    pub idiom: String,

    /// Size in points (e.g. "60x60", "83.5x83.5"); image sets leave it out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// The scale factor for the image (e.g. "1x", "2x", "3x")
    pub scale: String,
}

/// Versioning and authorship information for the asset catalog
#[derive(Serialize, Debug, Clone)]
pub struct Info {
    /// The format version of the asset catalog (always 1)
    pub version: u8,

    /// The tool that authored the asset catalog
    pub author: String,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            version: 1,
            author: AUTHOR.to_string(),
        }
    }
}

impl ContentsFile {
    pub fn new(images: Vec<ImageEntry>) -> Self {
        Self {
            images,
            info: Info::default(),
        }
    }
}

impl ImageEntry {
    /// Entry for an `.imageset`, which carries no point size
    pub fn image(filename: impl Into<String>, idiom: &str, scale: u32) -> Self {
        Self {
            filename: filename.into(),
            idiom: idiom.to_string(),
            size: None,
            scale: format!("{scale}x"),
        }
    }

    /// Entry for an `.appiconset`
    pub fn app_icon(filename: impl Into<String>, idiom: &str, size: &str, scale: u32) -> Self {
        Self {
            filename: filename.into(),
            idiom: idiom.to_string(),
            size: Some(size.to_string()),
            scale: format!("{scale}x"),
        }
    }
}

/// Write `Contents.json` for `images` into the asset set directory `dir`
pub fn write_contents_json(dir: &Path, images: Vec<ImageEntry>) -> Result<()> {
    let contents = ContentsFile::new(images);
    let json =
        serde_json::to_string_pretty(&contents).context("Failed to serialize Contents.json")?;
    std::fs::write(dir.join("Contents.json"), json).context("Failed to write Contents.json")
}
