use anyhow::Result;
use cap_resources::color::GradientParts;
use cap_resources::params::{Params, TargetParams};
use cap_resources::pipeline;
use cap_resources::prompts::{NoPrompt, TerminalPrompter};
use cap_resources::resources::PlatformWriter;
use clap::error::ErrorKind;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const PROGRAM: &str = env!("CARGO_BIN_NAME");

/// Values left out are asked for interactively.
#[derive(Debug, Parser)]
#[clap(
    name = "cap-resources",
    about = "Generate icon and splash screen resources for a Capacitor project"
)]
struct Args {
    /// Capacitor project path (the directory containing android/ and ios/).
    #[clap(short, long, value_name = "DIR")]
    project_path: Option<PathBuf>,

    /// Source image for the app icon.
    #[clap(long, value_name = "FILE")]
    icon_image: Option<PathBuf>,

    /// Share of the icon taken by the source image, in (0, 1] or as a percentage.
    #[clap(long, value_name = "RATIO")]
    icon_ratio: Option<f32>,

    /// Solid icon background color (hex, with or without '#').
    #[clap(long, value_name = "HEX")]
    icon_bgcolor: Option<String>,

    /// First icon background gradient color (hex).
    #[clap(long, value_name = "HEX")]
    icon_bg_grad_color1: Option<String>,

    /// Second icon background gradient color (hex).
    #[clap(long, value_name = "HEX")]
    icon_bg_grad_color2: Option<String>,

    /// Icon background gradient angle in degrees.
    #[clap(long, value_name = "DEG", allow_hyphen_values = true)]
    icon_bg_grad_angle: Option<i32>,

    /// Source image for the splash screen.
    #[clap(long, value_name = "FILE")]
    splash_image: Option<PathBuf>,

    /// Share of the splash screen taken by the source image, in (0, 1] or as a percentage.
    #[clap(long, value_name = "RATIO")]
    splash_ratio: Option<f32>,

    /// Solid splash screen background color (hex, with or without '#').
    #[clap(long, value_name = "HEX")]
    splash_bgcolor: Option<String>,

    /// First splash screen background gradient color (hex).
    #[clap(long, value_name = "HEX")]
    splash_bg_grad_color1: Option<String>,

    /// Second splash screen background gradient color (hex).
    #[clap(long, value_name = "HEX")]
    splash_bg_grad_color2: Option<String>,

    /// Splash screen background gradient angle in degrees.
    #[clap(long, value_name = "DEG", allow_hyphen_values = true)]
    splash_bg_grad_angle: Option<i32>,

    /// Generate resources for Android (`--android=false` to skip without asking).
    #[clap(
        short,
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    android: Option<bool>,

    /// Generate resources for iOS (`--ios=false` to skip without asking).
    #[clap(
        short,
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    ios: Option<bool>,

    /// Fail instead of asking for values that were not given.
    #[clap(long)]
    no_prompt: bool,
}

impl From<Args> for Params {
    fn from(args: Args) -> Self {
        Params {
            project_path: args.project_path,
            icon: TargetParams {
                image: args.icon_image,
                bgcolor: args.icon_bgcolor,
                gradient: GradientParts {
                    color1: args.icon_bg_grad_color1,
                    color2: args.icon_bg_grad_color2,
                    angle: args.icon_bg_grad_angle,
                },
                ratio: args.icon_ratio,
            },
            splash: TargetParams {
                image: args.splash_image,
                bgcolor: args.splash_bgcolor,
                gradient: GradientParts {
                    color1: args.splash_bg_grad_color1,
                    color2: args.splash_bg_grad_color2,
                    angle: args.splash_bg_grad_angle,
                },
                ratio: args.splash_ratio,
            },
            android: args.android,
            ios: args.ios,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                return ExitCode::FAILURE;
            }
        },
    };

    match generate_resources(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!();
            eprintln!("💀 Unable to continue: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

fn generate_resources(args: Args) -> Result<()> {
    let no_prompt = args.no_prompt;
    let params = Params::from(args);
    let mut generator = PlatformWriter;

    if no_prompt {
        pipeline::run(&params, &mut NoPrompt, &mut generator, PROGRAM)?;
    } else {
        pipeline::run(
            &params,
            &mut TerminalPrompter::stdio(),
            &mut generator,
            PROGRAM,
        )?;
    }

    Ok(())
}
