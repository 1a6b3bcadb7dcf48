//! Hex color parsing and gradient validation.

use std::str::FromStr;

use crate::background::{Gradient, Rgb};
use crate::error::{Error, Result};

/// Parse a `#rgb` / `#rrggbb` color. The leading `#` is optional.
pub fn parse_hex_color(input: &str) -> Result<Rgb> {
    let trimmed = input.trim();
    let normalized = if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{trimmed}")
    };

    // css-color also understands names and alpha forms, only plain hex is allowed here
    let digits = &normalized[1..];
    if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidColor(input.to_string()));
    }

    let color =
        css_color::Srgb::from_str(&normalized).map_err(|_| Error::InvalidColor(input.to_string()))?;

    Ok(Rgb::new(
        channel(color.red),
        channel(color.green),
        channel(color.blue),
    ))
}

fn channel(value: f32) -> u8 {
    (value * 255.).round().clamp(0., 255.) as u8
}

/// Lowercase `rrggbb`, without the leading `#`.
pub fn rgb_to_hex(color: Rgb) -> String {
    format!("{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// Raw gradient values as they come from flags, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradientParts {
    pub color1: Option<String>,
    pub color2: Option<String>,
    pub angle: Option<i32>,
}

impl GradientParts {
    pub fn present(&self) -> usize {
        [
            self.color1.is_some(),
            self.color2.is_some(),
            self.angle.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.present() == 0
    }
}

/// A gradient is all-or-nothing: no values gives `Ok(None)`, all three give the
/// gradient, anything in between is [`Error::IncompleteGradient`].
pub fn validate_gradient_completeness(parts: &GradientParts) -> Result<Option<Gradient>> {
    match (&parts.color1, &parts.color2, parts.angle) {
        (None, None, None) => Ok(None),
        (Some(color1), Some(color2), Some(angle)) => Ok(Some(Gradient::new(
            parse_hex_color(color1)?,
            parse_hex_color(color2)?,
            angle,
        ))),
        _ => Err(Error::IncompleteGradient {
            present: parts.present(),
        }),
    }
}
