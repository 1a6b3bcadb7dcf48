//! One run: resolve parameters, compose the icon and splash into a temporary
//! workspace, hand them to the resource generator and clean up.

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tracing::{debug, info};

use crate::compose::{composite, ICON_SIZE, SPLASH_SIZE};
use crate::error::{Error, Result};
use crate::params::{resolve, Params, ResolvedConfig};
use crate::prompts::Prompter;
use crate::resources::{ResourceConfig, ResourceGenerator, ICON_FILE, SPLASH_FILE};

const WORKSPACE_PREFIX: &str = "capResources";
const DESCRIPTOR_FILE: &str = "resources.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolveParams,
    ValidatePlatforms,
    CreateWorkspace,
    CompositeIcon,
    CompositeSplash,
    RunExternalGenerator,
    CleanupWorkspace,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub config: ResolvedConfig,
    /// Flags that reproduce the run without prompts.
    pub command: String,
    /// Measured from workspace creation.
    pub elapsed: Duration,
}

/// Run every stage in order. The workspace is removed whether or not the run
/// succeeds.
pub fn run(
    params: &Params,
    prompter: &mut dyn Prompter,
    generator: &mut dyn ResourceGenerator,
    program: &str,
) -> Result<Outcome> {
    let mut stage = Stage::ResolveParams;
    match execute(params, prompter, generator, program, &mut stage) {
        Ok(outcome) => {
            advance(&mut stage, Stage::Done);
            println!();
            println!("🔳 Hands-free command:");
            println!("{}", outcome.command);
            println!();
            println!("🐳 All Good! [{}ms]", outcome.elapsed.as_millis());
            Ok(outcome)
        }
        Err(err) => {
            debug!(%stage, "run failed");
            advance(&mut stage, Stage::Failed);
            Err(err)
        }
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(from = %stage, to = %next, "stage");
    *stage = next;
}

fn execute(
    params: &Params,
    prompter: &mut dyn Prompter,
    generator: &mut dyn ResourceGenerator,
    program: &str,
    stage: &mut Stage,
) -> Result<Outcome> {
    let config = resolve(params, prompter)?;

    advance(stage, Stage::ValidatePlatforms);
    let config = config.validate_platforms()?;
    let command = config.hands_free_command(program);

    advance(stage, Stage::CreateWorkspace);
    let started = Instant::now();
    let workspace = tempfile::Builder::new()
        .prefix(WORKSPACE_PREFIX)
        .tempdir()
        .map_err(Error::Workspace)?;
    debug!(workspace = %workspace.path().display(), "created workspace");

    // from here on an early return drops `workspace`, which deletes it
    let icon_path = workspace.path().join(ICON_FILE);
    let splash_path = workspace.path().join(SPLASH_FILE);

    advance(stage, Stage::CompositeIcon);
    composite(
        &config.icon_image,
        &icon_path,
        ICON_SIZE,
        config.icon_ratio,
        &config.icon_background,
    )?;
    println!("✓ Generated {ICON_FILE} ({ICON_SIZE}x{ICON_SIZE})");

    advance(stage, Stage::CompositeSplash);
    composite(
        &config.splash_image,
        &splash_path,
        SPLASH_SIZE,
        config.splash_ratio,
        &config.splash_background,
    )?;
    println!("✓ Generated {SPLASH_FILE} ({SPLASH_SIZE}x{SPLASH_SIZE})");

    advance(stage, Stage::RunExternalGenerator);
    let descriptor = ResourceConfig::new(
        workspace.path(),
        &config.project_path,
        config.android,
        config.ios,
    );
    write_descriptor(workspace.path(), &descriptor)?;
    println!();
    println!("About to generate platform resources:");
    println!();
    generator.generate(&descriptor).map_err(Error::Generator)?;

    advance(stage, Stage::CleanupWorkspace);
    println!();
    println!("🗑 Deleting temp files");
    remove_workspace(workspace)?;

    let elapsed = started.elapsed();
    info!(elapsed_ms = elapsed.as_millis() as u64, "resources generated");

    Ok(Outcome {
        config,
        command,
        elapsed,
    })
}

fn write_descriptor(workspace: &Path, descriptor: &ResourceConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(descriptor)
        .map_err(|err| Error::Workspace(err.into()))?;
    debug!(descriptor = %json, "resource descriptor");
    std::fs::write(workspace.join(DESCRIPTOR_FILE), json).map_err(Error::Workspace)
}

fn remove_workspace(workspace: TempDir) -> Result<()> {
    workspace.close().map_err(Error::Workspace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::{Background, Gradient, Rgb};
    use crate::color::GradientParts;
    use crate::params::TargetParams;
    use crate::prompts::NoPrompt;
    use crate::resources::Platform;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;

    /// Inspects the workspace while it still exists.
    #[derive(Default)]
    struct Recording {
        calls: Vec<ResourceConfig>,
        icon: Option<image::RgbImage>,
        splash_size: Option<(u32, u32)>,
        fail: bool,
    }

    impl ResourceGenerator for Recording {
        fn generate(&mut self, config: &ResourceConfig) -> anyhow::Result<()> {
            self.calls.push(config.clone());
            let dir = &config.resources_directory;
            assert!(dir.join(DESCRIPTOR_FILE).is_file());

            let icon = image::open(dir.join(ICON_FILE))?;
            assert_eq!(icon.color(), image::ColorType::Rgb8);
            self.icon = Some(icon.to_rgb8());
            let splash = image::open(dir.join(SPLASH_FILE))?;
            self.splash_size = Some((splash.width(), splash.height()));

            if self.fail {
                anyhow::bail!("placement failed");
            }
            Ok(())
        }
    }

    fn project(platforms: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        for platform in platforms {
            std::fs::create_dir(dir.path().join(platform)).unwrap();
        }
        let logo = dir.path().join("logo.png");
        RgbaImage::from_pixel(32, 32, Rgba([0, 0, 255, 255]))
            .save(&logo)
            .unwrap();
        (dir, logo)
    }

    fn params(project: &Path, logo: &Path) -> Params {
        Params {
            project_path: Some(project.to_path_buf()),
            icon: TargetParams {
                image: Some(logo.to_path_buf()),
                bgcolor: Some("#ff0000".to_string()),
                gradient: GradientParts::default(),
                ratio: Some(0.6),
            },
            splash: TargetParams {
                image: Some(logo.to_path_buf()),
                bgcolor: Some("#00ff00".to_string()),
                gradient: GradientParts::default(),
                ratio: Some(0.45),
            },
            android: Some(true),
            ios: Some(true),
        }
    }

    #[test]
    fn full_run_reaches_done() {
        let (dir, logo) = project(&["android"]);
        let mut generator = Recording::default();

        let outcome = run(&params(dir.path(), &logo), &mut NoPrompt, &mut generator, "cap-resources")
            .unwrap();

        assert_eq!(generator.calls.len(), 1);
        let descriptor = &generator.calls[0];
        assert_eq!(
            descriptor.platforms.keys().copied().collect::<Vec<_>>(),
            [Platform::Android]
        );
        assert!(!descriptor.resources_directory.exists());

        let icon = generator.icon.as_ref().unwrap();
        assert_eq!(icon.dimensions(), (ICON_SIZE, ICON_SIZE));
        assert_eq!(*icon.get_pixel(5, 5), image::Rgb([255, 0, 0]));
        assert_eq!(*icon.get_pixel(512, 512), image::Rgb([0, 0, 255]));
        assert_eq!(generator.splash_size, Some((SPLASH_SIZE, SPLASH_SIZE)));

        assert!(outcome.config.android);
        assert!(!outcome.config.ios);
        assert!(outcome.command.contains("--icon-bgcolor=#ff0000"));
        assert!(outcome.command.contains("--ios=false"));
    }

    #[test]
    fn generator_failure_still_cleans_up() {
        let (dir, logo) = project(&["ios"]);
        let mut generator = Recording {
            fail: true,
            ..Recording::default()
        };

        let err = run(&params(dir.path(), &logo), &mut NoPrompt, &mut generator, "cap-resources")
            .unwrap_err();

        assert!(matches!(err, Error::Generator(_)));
        assert!(!generator.calls[0].resources_directory.exists());
    }

    #[test]
    fn no_platform_stops_before_any_image_work() {
        let (dir, logo) = project(&[]);
        let mut generator = Recording::default();

        let err = run(&params(dir.path(), &logo), &mut NoPrompt, &mut generator, "cap-resources")
            .unwrap_err();

        assert!(matches!(err, Error::NoPlatformSelected));
        assert!(generator.calls.is_empty());
    }

    #[test]
    fn unreadable_source_aborts_the_run() {
        let (dir, logo) = project(&["android"]);
        let mut params = params(dir.path(), &logo);
        params.splash.image = Some(dir.path().join("missing.png"));
        let mut generator = Recording::default();

        let err = run(&params, &mut NoPrompt, &mut generator, "cap-resources").unwrap_err();

        assert!(matches!(err, Error::ImageRead { .. }));
        assert!(generator.calls.is_empty());
    }

    #[test]
    fn gradient_backgrounds_are_rendered() {
        let (dir, logo) = project(&["android"]);
        let mut params = params(dir.path(), &logo);
        params.icon.bgcolor = None;
        params.icon.gradient = GradientParts {
            color1: Some("ffffff".to_string()),
            color2: Some("000000".to_string()),
            angle: Some(0),
        };
        let mut generator = Recording::default();

        let outcome = run(&params, &mut NoPrompt, &mut generator, "cap-resources").unwrap();

        assert_eq!(
            outcome.config.icon_background,
            Background::Gradient(Gradient::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0), 0))
        );
        let icon = generator.icon.as_ref().unwrap();
        assert_eq!(*icon.get_pixel(0, 512), image::Rgb([255, 255, 255]));
        assert_eq!(*icon.get_pixel(1023, 512), image::Rgb([0, 0, 0]));
        assert!(outcome.command.contains("--icon-bg-grad-color1=ffffff"));
    }

    #[test]
    fn missing_values_without_prompts_fail() {
        let (dir, logo) = project(&["android"]);
        let mut params = params(dir.path(), &logo);
        params.android = None;

        let err = run(&params, &mut NoPrompt, &mut Recording::default(), "cap-resources")
            .unwrap_err();
        assert!(matches!(err, Error::MissingValue(_)));
    }
}
