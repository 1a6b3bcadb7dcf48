//! Merge flags, interactive answers and defaults into one [`ResolvedConfig`].

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::background::{Background, Gradient};
use crate::color::{parse_hex_color, rgb_to_hex, validate_gradient_completeness, GradientParts};
use crate::error::{Error, Result};
use crate::prompts::{PathKind, Prompter};

pub const DEFAULT_ICON_RATIO: f32 = 0.60;
pub const DEFAULT_SPLASH_RATIO: f32 = 0.45;

const BACKGROUND_CHOICES: [&str; 2] = ["solid color", "gradient"];

/// The two composed images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Icon,
    Splash,
}

impl Target {
    pub fn name(self) -> &'static str {
        match self {
            Target::Icon => "icon",
            Target::Splash => "splash",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Target::Icon => "Icon",
            Target::Splash => "Splash",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Target::Icon => "icon",
            Target::Splash => "splash screen",
        }
    }

    pub fn default_ratio(self) -> f32 {
        match self {
            Target::Icon => DEFAULT_ICON_RATIO,
            Target::Splash => DEFAULT_SPLASH_RATIO,
        }
    }
}

/// Values for one target as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct TargetParams {
    pub image: Option<PathBuf>,
    pub bgcolor: Option<String>,
    pub gradient: GradientParts,
    pub ratio: Option<f32>,
}

/// Everything that may come from flags. `None` means "ask".
#[derive(Debug, Clone, Default)]
pub struct Params {
    pub project_path: Option<PathBuf>,
    pub icon: TargetParams,
    pub splash: TargetParams,
    pub android: Option<bool>,
    pub ios: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub project_path: PathBuf,
    pub icon_image: PathBuf,
    pub icon_background: Background,
    pub icon_ratio: f32,
    pub splash_image: PathBuf,
    pub splash_background: Background,
    pub splash_ratio: f32,
    pub android: bool,
    pub ios: bool,
}

/// Ratios above 1 are percentages.
pub fn normalize_ratio(ratio: f32) -> f32 {
    if ratio > 1.0 {
        ratio / 100.0
    } else {
        ratio
    }
}

fn checked_ratio(target: Target, raw: f32) -> Result<f32> {
    let value = normalize_ratio(raw);
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(Error::InvalidRatio {
            target: target.name(),
            value: raw,
        })
    }
}

/// Reject a solid color and gradient flags given for the same target.
pub fn check_conflicts(params: &Params) -> Result<()> {
    for (target, values) in [(Target::Icon, &params.icon), (Target::Splash, &params.splash)] {
        if values.bgcolor.is_some() && !values.gradient.is_empty() {
            return Err(Error::ConflictingBackground {
                target: target.name(),
            });
        }
    }
    Ok(())
}

/// Fill every field, asking `prompter` for whatever the flags left unset.
///
/// Fields are resolved in a fixed order and each one given as a flag is echoed
/// so the user can see what will be used.
pub fn resolve(params: &Params, prompter: &mut dyn Prompter) -> Result<ResolvedConfig> {
    check_conflicts(params)?;

    let project_path = match &params.project_path {
        Some(path) => {
            println!("🔹 Project path set: {}", path.display());
            path.clone()
        }
        None => prompter.ask_path("Select capacitor project path", PathKind::Directory)?,
    };
    if !project_path.is_dir() {
        return Err(Error::ProjectNotFound(project_path));
    }

    let icon_image = resolve_image(Target::Icon, &params.icon, prompter)?;
    let icon_background = resolve_background(Target::Icon, &params.icon, prompter)?;
    let icon_ratio = resolve_ratio(Target::Icon, &params.icon, prompter)?;

    let splash_image = resolve_image(Target::Splash, &params.splash, prompter)?;
    let splash_background = resolve_background(Target::Splash, &params.splash, prompter)?;
    let splash_ratio = resolve_ratio(Target::Splash, &params.splash, prompter)?;

    let android = resolve_platform("android", params.android, prompter)?;
    let ios = resolve_platform("ios", params.ios, prompter)?;

    Ok(ResolvedConfig {
        project_path,
        icon_image,
        icon_background,
        icon_ratio,
        splash_image,
        splash_background,
        splash_ratio,
        android,
        ios,
    })
}

fn resolve_image(
    target: Target,
    values: &TargetParams,
    prompter: &mut dyn Prompter,
) -> Result<PathBuf> {
    match &values.image {
        Some(path) => {
            println!("🔹 {} image path set: {}", target.label(), path.display());
            Ok(path.clone())
        }
        None => prompter.ask_path(
            &format!("Enter {} image path", target.description()),
            PathKind::File,
        ),
    }
}

fn resolve_background(
    target: Target,
    values: &TargetParams,
    prompter: &mut dyn Prompter,
) -> Result<Background> {
    if let Some(color) = &values.bgcolor {
        let color = parse_hex_color(color)?;
        println!("🔹 {} background set: {color}", target.label());
        return Ok(Background::Solid(color));
    }

    match validate_gradient_completeness(&values.gradient) {
        Ok(Some(gradient)) => {
            println!("🔹 {} background gradient set: {gradient}", target.label());
            return Ok(Background::Gradient(gradient));
        }
        Ok(None) => {}
        Err(Error::IncompleteGradient { present }) => {
            warn!(
                image = target.name(),
                present,
                "🔴 Incomplete {} background gradient, color1, color2 and angle are all required (ignoring)",
                target.description()
            );
        }
        Err(err) => return Err(err),
    }

    let choice = prompter.ask_choice(
        &format!("Select background type for {}", target.description()),
        &BACKGROUND_CHOICES,
    )?;
    let background = if choice == 0 {
        Background::Solid(
            prompter.ask_color(&format!("Enter {} background color", target.description()))?,
        )
    } else {
        Background::Gradient(
            prompter.ask_gradient(&format!("Enter {} background gradient", target.description()))?,
        )
    };
    Ok(background)
}

fn resolve_ratio(target: Target, values: &TargetParams, prompter: &mut dyn Prompter) -> Result<f32> {
    match values.ratio {
        Some(raw) => {
            let ratio = checked_ratio(target, raw)?;
            println!("🔹 {} size ratio set: {ratio}", target.label());
            Ok(ratio)
        }
        None => {
            let answer = prompter.ask_ratio(
                &format!("Enter {} size ratio", target.description()),
                target.default_ratio(),
            )?;
            checked_ratio(target, answer)
        }
    }
}

fn resolve_platform(name: &str, flag: Option<bool>, prompter: &mut dyn Prompter) -> Result<bool> {
    match flag {
        Some(enabled) => {
            println!(
                "🔹 Building resources for {name}: {}",
                if enabled { "✅" } else { "❌" }
            );
            Ok(enabled)
        }
        None => prompter.ask_confirmation(&format!("Build resources for {name}")),
    }
}

impl ResolvedConfig {
    /// Drop requested platforms whose project folder is missing.
    ///
    /// Fails with [`Error::NoPlatformSelected`] when nothing is left to build.
    pub fn validate_platforms(mut self) -> Result<Self> {
        if self.android && !self.project_path.join("android").exists() {
            warn!("🔴 No android platform folder found. (skipping)");
            self.android = false;
        }

        if self.ios && !self.project_path.join("ios").exists() {
            warn!("🔴 No ios platform folder found. (skipping)");
            self.ios = false;
        }

        if !self.android && !self.ios {
            return Err(Error::NoPlatformSelected);
        }

        Ok(self)
    }

    /// A command line that repeats this run without asking anything.
    pub fn hands_free_command(&self, program: &str) -> String {
        let mut cmd = program.to_string();

        push_flag(&mut cmd, "project-path", &path_arg(&self.project_path));
        for (target, image, background, ratio) in [
            (
                Target::Icon,
                &self.icon_image,
                &self.icon_background,
                self.icon_ratio,
            ),
            (
                Target::Splash,
                &self.splash_image,
                &self.splash_background,
                self.splash_ratio,
            ),
        ] {
            let name = target.name();
            push_flag(&mut cmd, &format!("{name}-image"), &path_arg(image));
            match background {
                Background::Solid(color) => {
                    let hex = format!("#{}", rgb_to_hex(*color));
                    push_flag(&mut cmd, &format!("{name}-bgcolor"), &hex);
                }
                Background::Gradient(gradient) => push_gradient(&mut cmd, name, gradient),
            }
            push_flag(&mut cmd, &format!("{name}-ratio"), &ratio.to_string());
        }
        push_flag(&mut cmd, "android", &self.android.to_string());
        push_flag(&mut cmd, "ios", &self.ios.to_string());

        cmd
    }
}

fn push_gradient(cmd: &mut String, name: &str, gradient: &Gradient) {
    push_flag(cmd, &format!("{name}-bg-grad-color1"), &rgb_to_hex(gradient.color1));
    push_flag(cmd, &format!("{name}-bg-grad-color2"), &rgb_to_hex(gradient.color2));
    push_flag(cmd, &format!("{name}-bg-grad-angle"), &gradient.angle().to_string());
}

fn push_flag(cmd: &mut String, flag: &str, value: &str) {
    cmd.push_str(&format!(" --{flag}={}", shell_quote(value)));
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+:,@%#".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::Rgb;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    #[derive(Debug)]
    enum Answer {
        Path(PathBuf),
        Choice(usize),
        Color(Rgb),
        Gradient(Gradient),
        Ratio(f32),
        Confirm(bool),
    }

    /// Answers questions from a fixed script and records what was asked.
    #[derive(Default)]
    struct Scripted {
        answers: VecDeque<Answer>,
        asked: Vec<String>,
    }

    impl Scripted {
        fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                asked: Vec::new(),
            }
        }

        fn next(&mut self, message: &str) -> Answer {
            self.asked.push(message.to_string());
            self.answers
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected question: {message}"))
        }
    }

    impl Prompter for Scripted {
        fn ask_path(&mut self, message: &str, _kind: PathKind) -> Result<PathBuf> {
            match self.next(message) {
                Answer::Path(path) => Ok(path),
                other => panic!("{message}: got {other:?}"),
            }
        }

        fn ask_choice(&mut self, message: &str, _choices: &[&str]) -> Result<usize> {
            match self.next(message) {
                Answer::Choice(choice) => Ok(choice),
                other => panic!("{message}: got {other:?}"),
            }
        }

        fn ask_color(&mut self, message: &str) -> Result<Rgb> {
            match self.next(message) {
                Answer::Color(color) => Ok(color),
                other => panic!("{message}: got {other:?}"),
            }
        }

        fn ask_gradient(&mut self, message: &str) -> Result<Gradient> {
            match self.next(message) {
                Answer::Gradient(gradient) => Ok(gradient),
                other => panic!("{message}: got {other:?}"),
            }
        }

        fn ask_ratio(&mut self, message: &str, default: f32) -> Result<f32> {
            match self.next(message) {
                Answer::Ratio(ratio) if ratio.is_nan() => Ok(default),
                Answer::Ratio(ratio) => Ok(ratio),
                other => panic!("{message}: got {other:?}"),
            }
        }

        fn ask_confirmation(&mut self, message: &str) -> Result<bool> {
            match self.next(message) {
                Answer::Confirm(confirmed) => Ok(confirmed),
                other => panic!("{message}: got {other:?}"),
            }
        }
    }

    fn full_params(project: &Path) -> Params {
        Params {
            project_path: Some(project.to_path_buf()),
            icon: TargetParams {
                image: Some("logo.png".into()),
                bgcolor: Some("#ff0000".to_string()),
                gradient: GradientParts::default(),
                ratio: Some(0.6),
            },
            splash: TargetParams {
                image: Some("logo.png".into()),
                bgcolor: Some("00ff00".to_string()),
                gradient: GradientParts::default(),
                ratio: Some(0.45),
            },
            android: Some(true),
            ios: Some(false),
        }
    }

    #[test]
    fn flags_need_no_prompts() {
        let project = TempDir::new().unwrap();
        let mut prompter = Scripted::default();

        let config = resolve(&full_params(project.path()), &mut prompter).unwrap();

        assert!(prompter.asked.is_empty());
        assert_eq!(config.icon_background, Background::Solid(Rgb::new(255, 0, 0)));
        assert_eq!(config.splash_background, Background::Solid(Rgb::new(0, 255, 0)));
        assert_eq!(config.icon_ratio, 0.6);
        assert_eq!(config.splash_ratio, 0.45);
        assert!(config.android);
        assert!(!config.ios);
    }

    #[test]
    fn unset_fields_are_asked_in_order() {
        let project = TempDir::new().unwrap();
        let gradient = Gradient::new(Rgb::new(1, 2, 3), Rgb::new(4, 5, 6), 90);
        let mut prompter = Scripted::new([
            Answer::Path(project.path().to_path_buf()),
            Answer::Path("icon.png".into()),
            Answer::Choice(0),
            Answer::Color(Rgb::new(9, 9, 9)),
            Answer::Ratio(f32::NAN),
            Answer::Path("splash.png".into()),
            Answer::Choice(1),
            Answer::Gradient(gradient),
            Answer::Ratio(50.0),
            Answer::Confirm(true),
            Answer::Confirm(false),
        ]);

        let config = resolve(&Params::default(), &mut prompter).unwrap();

        assert_eq!(
            prompter.asked,
            [
                "Select capacitor project path",
                "Enter icon image path",
                "Select background type for icon",
                "Enter icon background color",
                "Enter icon size ratio",
                "Enter splash screen image path",
                "Select background type for splash screen",
                "Enter splash screen background gradient",
                "Enter splash screen size ratio",
                "Build resources for android",
                "Build resources for ios",
            ]
        );
        assert_eq!(config.icon_ratio, DEFAULT_ICON_RATIO);
        assert_eq!(config.splash_ratio, 0.5);
        assert_eq!(config.splash_background, Background::Gradient(gradient));
        assert!(config.android && !config.ios);
    }

    #[test]
    fn incomplete_gradient_is_discarded_and_asked_for() {
        let project = TempDir::new().unwrap();
        let mut params = full_params(project.path());
        params.icon.bgcolor = None;
        params.icon.gradient = GradientParts {
            color1: Some("aaa".to_string()),
            color2: Some("bbb".to_string()),
            angle: None,
        };
        let mut prompter = Scripted::new([Answer::Choice(0), Answer::Color(Rgb::new(7, 7, 7))]);

        let config = resolve(&params, &mut prompter).unwrap();

        assert_eq!(config.icon_background, Background::Solid(Rgb::new(7, 7, 7)));
        assert_eq!(prompter.asked[0], "Select background type for icon");
    }

    #[test]
    fn complete_gradient_flags_are_used() {
        let project = TempDir::new().unwrap();
        let mut params = full_params(project.path());
        params.splash.bgcolor = None;
        params.splash.gradient = GradientParts {
            color1: Some("#000000".to_string()),
            color2: Some("ffffff".to_string()),
            angle: Some(-500),
        };

        let config = resolve(&params, &mut Scripted::default()).unwrap();

        assert_eq!(
            config.splash_background,
            Background::Gradient(Gradient::new(Rgb::new(0, 0, 0), Rgb::new(255, 255, 255), -360))
        );
    }

    #[test]
    fn solid_and_gradient_flags_conflict() {
        let project = TempDir::new().unwrap();
        let mut params = full_params(project.path());
        params.icon.bgcolor = Some("#fff".to_string());
        params.icon.gradient.color1 = Some("aaa".to_string());

        let err = resolve(&params, &mut Scripted::default()).unwrap_err();
        assert!(matches!(err, Error::ConflictingBackground { target: "icon" }));
    }

    #[test]
    fn invalid_flag_color_is_fatal() {
        let project = TempDir::new().unwrap();
        let mut params = full_params(project.path());
        params.splash.bgcolor = Some("#zzz".to_string());

        let err = resolve(&params, &mut Scripted::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidColor(_)));
    }

    #[test]
    fn ratios_accept_percentages_and_reject_out_of_range() {
        let project = TempDir::new().unwrap();
        let mut params = full_params(project.path());
        params.icon.ratio = Some(75.0);
        let config = resolve(&params, &mut Scripted::default()).unwrap();
        assert_eq!(config.icon_ratio, 0.75);

        params.icon.ratio = Some(0.0);
        let err = resolve(&params, &mut Scripted::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidRatio { target: "icon", .. }));

        params.icon.ratio = Some(250.0);
        assert!(resolve(&params, &mut Scripted::default()).is_err());
    }

    #[test]
    fn missing_project_directory_is_rejected() {
        let project = TempDir::new().unwrap();
        let params = full_params(&project.path().join("nope"));
        let err = resolve(&params, &mut Scripted::default()).unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound(_)));
    }

    fn resolved(project: &Path, android: bool, ios: bool) -> ResolvedConfig {
        let mut params = full_params(project);
        params.android = Some(android);
        params.ios = Some(ios);
        resolve(&params, &mut Scripted::default()).unwrap()
    }

    #[test]
    fn missing_platform_folders_are_dropped() {
        let project = TempDir::new().unwrap();
        std::fs::create_dir(project.path().join("ios")).unwrap();

        let config = resolved(project.path(), true, true).validate_platforms().unwrap();
        assert!(!config.android);
        assert!(config.ios);
    }

    #[test]
    fn no_platform_left_is_an_error() {
        let project = TempDir::new().unwrap();
        let err = resolved(project.path(), true, true)
            .validate_platforms()
            .unwrap_err();
        assert!(matches!(err, Error::NoPlatformSelected));

        std::fs::create_dir(project.path().join("android")).unwrap();
        let err = resolved(project.path(), false, false)
            .validate_platforms()
            .unwrap_err();
        assert!(matches!(err, Error::NoPlatformSelected));
    }

    #[test]
    fn hands_free_command_encodes_every_value() {
        let config = ResolvedConfig {
            project_path: "/work/my app".into(),
            icon_image: "/work/logo.png".into(),
            icon_background: Background::Solid(Rgb::new(255, 0, 0)),
            icon_ratio: 0.6,
            splash_image: "/work/logo.png".into(),
            splash_background: Background::Gradient(Gradient::new(
                Rgb::new(0xaa, 0xaa, 0xaa),
                Rgb::new(0, 0x11, 0x22),
                -45,
            )),
            splash_ratio: 0.45,
            android: true,
            ios: false,
        };

        assert_eq!(
            config.hands_free_command("cap-resources"),
            "cap-resources --project-path='/work/my app' --icon-image=/work/logo.png \
             --icon-bgcolor=#ff0000 --icon-ratio=0.6 --splash-image=/work/logo.png \
             --splash-bg-grad-color1=aaaaaa --splash-bg-grad-color2=001122 \
             --splash-bg-grad-angle=-45 --splash-ratio=0.45 --android=true --ios=false"
        );
    }

    #[test]
    fn quoting_escapes_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("a/b.png"), "a/b.png");
    }
}
