//! Background fills used behind a composited foreground image.

use std::fmt;

use crate::color::rgb_to_hex;

pub const MIN_ANGLE: i32 = -360;
pub const MAX_ANGLE: i32 = 360;

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for image::Rgba<u8> {
    fn from(color: Rgb) -> Self {
        image::Rgba([color.r, color.g, color.b, 255])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Two-stop linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub color1: Rgb,
    pub color2: Rgb,
    angle: i32,
}

impl Gradient {
    /// The angle is clamped to `[-360, 360]` degrees.
    pub fn new(color1: Rgb, color2: Rgb, angle: i32) -> Self {
        Self {
            color1,
            color2,
            angle: angle.clamp(MIN_ANGLE, MAX_ANGLE),
        }
    }

    pub fn angle(&self) -> i32 {
        self.angle
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} ({}deg)",
            rgb_to_hex(self.color1),
            rgb_to_hex(self.color2),
            self.angle
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Solid(Rgb),
    Gradient(Gradient),
}

impl Background {
    pub fn is_gradient(&self) -> bool {
        matches!(self, Background::Gradient(_))
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::Solid(color) => write!(f, "{color}"),
            Background::Gradient(gradient) => write!(f, "gradient {gradient}"),
        }
    }
}
