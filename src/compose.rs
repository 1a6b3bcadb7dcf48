use std::path::Path;

use image::{imageops::FilterType, DynamicImage, ImageFormat, Rgba, RgbaImage};
use tracing::debug;

use crate::background::{Background, Gradient};
use crate::error::{Error, Result};

pub const ICON_SIZE: u32 = 1024;
pub const SPLASH_SIZE: u32 = 2732;

/// Gradient stop offsets, as a fraction of the gradient line.
const GRADIENT_START: f32 = 0.04;
const GRADIENT_END: f32 = 0.96;

/// Compose `source` centered on a `canvas_size` square background and write it as
/// an opaque PNG. The source is fitted into `canvas_size * content_ratio` pixels
/// without cropping.
pub fn composite(
    source: &Path,
    output: &Path,
    canvas_size: u32,
    content_ratio: f32,
    background: &Background,
) -> Result<()> {
    let image = image::open(source).map_err(|source_err| Error::ImageRead {
        path: source.to_path_buf(),
        source: source_err,
    })?;

    let content_size = content_size(canvas_size, content_ratio);
    debug!(
        source = %source.display(),
        canvas_size,
        content_size,
        %background,
        "compositing"
    );

    let foreground = contain(&image, content_size);

    let mut canvas = match background {
        Background::Solid(color) => RgbaImage::from_pixel(canvas_size, canvas_size, (*color).into()),
        Background::Gradient(gradient) => render_gradient(gradient, canvas_size),
    };

    let offset = (canvas_size.saturating_sub(content_size) / 2) as i64;
    image::imageops::overlay(&mut canvas, &foreground, offset, offset);

    let flattened = DynamicImage::ImageRgba8(canvas).to_rgb8();
    flattened
        .save_with_format(output, ImageFormat::Png)
        .map_err(|source| Error::ImageWrite {
            path: output.to_path_buf(),
            source,
        })?;

    Ok(())
}

fn content_size(canvas_size: u32, content_ratio: f32) -> u32 {
    ((canvas_size as f32 * content_ratio).round() as u32).clamp(1, canvas_size.max(1))
}

/// Fit `image` inside a transparent `size` square, keeping its aspect ratio.
fn contain(image: &DynamicImage, size: u32) -> RgbaImage {
    let resized = image.resize(size, size, FilterType::Lanczos3);

    let mut layer = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    let x = size.saturating_sub(resized.width()) / 2;
    let y = size.saturating_sub(resized.height()) / 2;
    image::imageops::overlay(&mut layer, &resized.to_rgba8(), x.into(), y.into());

    layer
}

/// Rasterise a two-stop linear gradient over a `size` square.
///
/// At 0 degrees `color1` is on the left and `color2` on the right; the gradient
/// line is rotated clockwise around the center by the gradient's angle.
pub fn render_gradient(gradient: &Gradient, size: u32) -> RgbaImage {
    let radians = (gradient.angle() as f32).to_radians();
    let (sin, cos) = radians.sin_cos();
    let half = size as f32 / 2.0;
    let length = size.max(1) as f32;

    let from = gradient.color1;
    let to = gradient.color2;

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - half;
        let dy = y as f32 + 0.5 - half;
        let t = 0.5 + (dx * cos + dy * sin) / length;

        let mix = ((t - GRADIENT_START) / (GRADIENT_END - GRADIENT_START)).clamp(0.0, 1.0);
        Rgba([
            lerp(from.r, to.r, mix),
            lerp(from.g, to.g, mix),
            lerp(from.b, to.b, mix),
            255,
        ])
    })
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round() as u8
}
