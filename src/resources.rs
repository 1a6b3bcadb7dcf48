//! Resource generation: the descriptor handed to a generator and the built-in
//! generator that places icons and splash screens into a Capacitor project.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{imageops::FilterType, DynamicImage, Rgba};
use serde::Serialize;

use crate::contents_json::{write_contents_json, ImageEntry};

pub const ICON_FILE: &str = "icon.png";
pub const SPLASH_FILE: &str = "splash.png";

/// Launcher icon sizes per density bucket
const LAUNCHER_DENSITIES: [(&str, u32); 5] = [
    ("mdpi", 48),
    ("hdpi", 72),
    ("xhdpi", 96),
    ("xxhdpi", 144),
    ("xxxhdpi", 192),
];

/// Adaptive icon layers are 108dp with a 72dp visible area
const ADAPTIVE_DENSITIES: [(&str, u32); 5] = [
    ("mdpi", 108),
    ("hdpi", 162),
    ("xhdpi", 216),
    ("xxhdpi", 324),
    ("xxxhdpi", 432),
];

/// Portrait splash sizes (width, height); landscape swaps them
const SPLASH_DENSITIES: [(&str, u32, u32); 5] = [
    ("mdpi", 320, 480),
    ("hdpi", 480, 800),
    ("xhdpi", 720, 1280),
    ("xxhdpi", 960, 1600),
    ("xxxhdpi", 1280, 1920),
];

/// (idiom, size in points, scale)
const IOS_APP_ICONS: [(&str, &str, u32); 18] = [
    ("iphone", "20x20", 2),
    ("iphone", "20x20", 3),
    ("iphone", "29x29", 2),
    ("iphone", "29x29", 3),
    ("iphone", "40x40", 2),
    ("iphone", "40x40", 3),
    ("iphone", "60x60", 2),
    ("iphone", "60x60", 3),
    ("ipad", "20x20", 1),
    ("ipad", "20x20", 2),
    ("ipad", "29x29", 1),
    ("ipad", "29x29", 2),
    ("ipad", "40x40", 1),
    ("ipad", "40x40", 2),
    ("ipad", "76x76", 1),
    ("ipad", "76x76", 2),
    ("ipad", "83.5x83.5", 2),
    ("ios-marketing", "1024x1024", 1),
];

const IOS_SPLASH_SIZE: u32 = 2732;

/// Splash screens are mostly flat backgrounds scaled down from 2732px
const SPLASH_FILTER: FilterType = FilterType::Triangle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    pub fn name(self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sources {
    pub sources: Vec<PathBuf>,
}

impl Sources {
    fn single(path: PathBuf) -> Self {
        Self {
            sources: vec![path],
        }
    }

    fn first(&self) -> Result<&Path> {
        self.sources
            .first()
            .map(PathBuf::as_path)
            .context("Resource entry has no source image")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdaptiveIcon {
    pub icon: Sources,
    pub background: Sources,
    pub foreground: Sources,
}

/// Which generated file feeds which artifact of one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformManifest {
    #[serde(rename = "adaptive-icon", skip_serializing_if = "Option::is_none")]
    pub adaptive_icon: Option<AdaptiveIcon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Sources>,
    pub splash: Sources,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDirectory {
    pub directory: PathBuf,
}

/// Declarative input of a resource generator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfig {
    pub resources_directory: PathBuf,
    pub project_config: BTreeMap<Platform, ProjectDirectory>,
    pub platforms: BTreeMap<Platform, PlatformManifest>,
}

impl ResourceConfig {
    /// Describe `icon.png` and `splash.png` in `resources_directory` for the
    /// selected platforms of the project at `project_path`.
    pub fn new(resources_directory: &Path, project_path: &Path, android: bool, ios: bool) -> Self {
        let icon = resources_directory.join(ICON_FILE);
        let splash = resources_directory.join(SPLASH_FILE);

        let mut project_config = BTreeMap::new();
        let mut platforms = BTreeMap::new();

        if android {
            project_config.insert(
                Platform::Android,
                ProjectDirectory {
                    directory: project_path.join("android"),
                },
            );
            platforms.insert(
                Platform::Android,
                PlatformManifest {
                    adaptive_icon: Some(AdaptiveIcon {
                        icon: Sources::single(icon.clone()),
                        background: Sources::single(icon.clone()),
                        foreground: Sources::single(icon.clone()),
                    }),
                    icon: None,
                    splash: Sources::single(splash.clone()),
                },
            );
        }

        if ios {
            project_config.insert(
                Platform::Ios,
                ProjectDirectory {
                    directory: project_path.join("ios"),
                },
            );
            platforms.insert(
                Platform::Ios,
                PlatformManifest {
                    adaptive_icon: None,
                    icon: Some(Sources::single(icon)),
                    splash: Sources::single(splash),
                },
            );
        }

        Self {
            resources_directory: resources_directory.to_path_buf(),
            project_config,
            platforms,
        }
    }
}

/// Places generated images into a project. Invoked once per run.
pub trait ResourceGenerator {
    fn generate(&mut self, config: &ResourceConfig) -> Result<()>;
}

/// Writes Android `res/` and iOS asset catalog files directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformWriter;

impl ResourceGenerator for PlatformWriter {
    fn generate(&mut self, config: &ResourceConfig) -> Result<()> {
        for (platform, manifest) in &config.platforms {
            let directory = &config
                .project_config
                .get(platform)
                .with_context(|| format!("No project directory configured for {platform}"))?
                .directory;

            match platform {
                Platform::Android => generate_android(directory, manifest)?,
                Platform::Ios => generate_ios(directory, manifest)?,
            }
        }
        Ok(())
    }
}

fn generate_android(android_dir: &Path, manifest: &PlatformManifest) -> Result<()> {
    println!("Generating Android resources...");
    let res_dir = android_dir.join("app").join("src").join("main").join("res");

    let adaptive = manifest
        .adaptive_icon
        .as_ref()
        .context("Android resources need an adaptive-icon entry")?;

    let icon = load_image(adaptive.icon.first()?)?;
    for (density, size) in LAUNCHER_DENSITIES {
        let mipmap_dir = res_dir.join(format!("mipmap-{density}"));
        create_dir_all(&mipmap_dir)?;

        let resized = icon.resize_exact(size, size, FilterType::Lanczos3);
        save_png(&resized, &mipmap_dir.join("ic_launcher.png"))?;
        save_png(
            &apply_circular_mask(&resized),
            &mipmap_dir.join("ic_launcher_round.png"),
        )?;
        println!("  ✓ Generated android/mipmap-{density}/ic_launcher.png, ic_launcher_round.png");
    }

    let foreground = load_image(adaptive.foreground.first()?)?;
    let background = load_image(adaptive.background.first()?)?;
    for (density, size) in ADAPTIVE_DENSITIES {
        let mipmap_dir = res_dir.join(format!("mipmap-{density}"));

        let layer = foreground.resize_exact(size, size, FilterType::Lanczos3);
        save_png(&layer, &mipmap_dir.join("ic_launcher_foreground.png"))?;
        let layer = background.resize_exact(size, size, FilterType::Lanczos3);
        save_png(&layer, &mipmap_dir.join("ic_launcher_background.png"))?;
        println!("  ✓ Generated android/mipmap-{density}/ic_launcher_foreground.png, ic_launcher_background.png");
    }

    generate_adaptive_icon_xml(&res_dir)?;

    let splash = load_image(manifest.splash.first()?)?;
    let drawable_dir = res_dir.join("drawable");
    create_dir_all(&drawable_dir)?;
    save_png(
        &splash.resize_to_fill(480, 320, SPLASH_FILTER),
        &drawable_dir.join("splash.png"),
    )?;
    println!("  ✓ Generated android/drawable/splash.png");

    for (density, width, height) in SPLASH_DENSITIES {
        for (orientation, w, h) in [("port", width, height), ("land", height, width)] {
            let dir = res_dir.join(format!("drawable-{orientation}-{density}"));
            create_dir_all(&dir)?;
            save_png(
                &splash.resize_to_fill(w, h, SPLASH_FILTER),
                &dir.join("splash.png"),
            )?;
            println!("  ✓ Generated android/drawable-{orientation}-{density}/splash.png");
        }
    }

    Ok(())
}

/// Adaptive icon XML referencing the foreground and background mipmaps
fn generate_adaptive_icon_xml(res_dir: &Path) -> Result<()> {
    let anydpi_dir = res_dir.join("mipmap-anydpi-v26");
    create_dir_all(&anydpi_dir)?;

    let adaptive_icon_xml = r#"<?xml version="1.0" encoding="utf-8"?>
<adaptive-icon xmlns:android="http://schemas.android.com/apk/res/android">
    <background android:drawable="@mipmap/ic_launcher_background" />
    <foreground android:drawable="@mipmap/ic_launcher_foreground" />
</adaptive-icon>"#;

    for name in ["ic_launcher.xml", "ic_launcher_round.xml"] {
        std::fs::write(anydpi_dir.join(name), adaptive_icon_xml)
            .with_context(|| format!("Failed to write {name}"))?;
        println!("  ✓ Generated android/mipmap-anydpi-v26/{name}");
    }

    Ok(())
}

fn generate_ios(ios_dir: &Path, manifest: &PlatformManifest) -> Result<()> {
    println!("Generating iOS resources...");
    let assets_dir = ios_dir.join("App").join("App").join("Assets.xcassets");

    let icon_source = manifest
        .icon
        .as_ref()
        .context("iOS resources need an icon entry")?;
    let icon = load_image(icon_source.first()?)?;

    let icon_dir = assets_dir.join("AppIcon.appiconset");
    create_dir_all(&icon_dir)?;

    let mut images = Vec::new();
    let mut written = Vec::new();
    for (idiom, points, scale) in IOS_APP_ICONS {
        let filename = if idiom == "ios-marketing" {
            "AppIcon-512@2x.png".to_string()
        } else {
            format!("AppIcon-{points}@{scale}x.png")
        };

        if !written.contains(&filename) {
            let size = icon_pixels(points, scale)?;
            let resized = icon.resize_exact(size, size, FilterType::Lanczos3);
            save_png(&resized, &icon_dir.join(&filename))?;
            println!("  ✓ Generated ios/AppIcon.appiconset/{filename}");
            written.push(filename.clone());
        }

        images.push(ImageEntry::app_icon(filename, idiom, points, scale));
    }
    write_contents_json(&icon_dir, images)?;
    println!("  ✓ Generated ios/AppIcon.appiconset/Contents.json");

    let splash = load_image(manifest.splash.first()?)?;
    let splash = if splash.width() == IOS_SPLASH_SIZE && splash.height() == IOS_SPLASH_SIZE {
        splash
    } else {
        splash.resize_to_fill(IOS_SPLASH_SIZE, IOS_SPLASH_SIZE, SPLASH_FILTER)
    };

    let splash_dir = assets_dir.join("Splash.imageset");
    create_dir_all(&splash_dir)?;

    let mut images = Vec::new();
    for (scale, filename) in [
        (1, "splash-2732x2732.png"),
        (2, "splash-2732x2732-1.png"),
        (3, "splash-2732x2732-2.png"),
    ] {
        save_png(&splash, &splash_dir.join(filename))?;
        println!("  ✓ Generated ios/Splash.imageset/{filename}");
        images.push(ImageEntry::image(filename, "universal", scale));
    }
    write_contents_json(&splash_dir, images)?;
    println!("  ✓ Generated ios/Splash.imageset/Contents.json");

    Ok(())
}

/// Pixel size of an icon given as "WxH" points at `scale`
fn icon_pixels(points: &str, scale: u32) -> Result<u32> {
    let width = points
        .split('x')
        .next()
        .and_then(|w| w.parse::<f32>().ok())
        .with_context(|| format!("Bad icon size: {points}"))?;
    Ok((width * scale as f32).round() as u32)
}

fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("Failed to load image {}", path.display()))
}

fn save_png(image: &DynamicImage, path: &Path) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    image
        .write_to(&mut file, image::ImageOutputFormat::Png)
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    Ok(())
}

/// Apply a circular mask to an image to create a round icon
fn apply_circular_mask(img: &DynamicImage) -> DynamicImage {
    let width = img.width();
    let height = img.height();
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let radius = width.min(height) as f32 / 2.0;

    let mut rgba_img = img.to_rgba8();

    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 + 0.5 - center_x;
            let dy = y as f32 + 0.5 - center_y;
            let distance = (dx * dx + dy * dy).sqrt();

            if distance > radius {
                rgba_img.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            } else if distance > radius - 1.0 {
                // anti-aliased edge
                let alpha_factor = radius - distance;
                let pixel = rgba_img.get_pixel_mut(x, y);
                pixel[3] = (pixel[3] as f32 * alpha_factor) as u8;
            }
        }
    }

    DynamicImage::ImageRgba8(rgba_img)
}
