//! Interactive questions asked for values that were not given as flags.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::background::{Gradient, Rgb};
use crate::color::parse_hex_color;
use crate::error::{Error, Result};
use crate::params::normalize_ratio;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

/// The capability set the resolver needs from a user.
pub trait Prompter {
    fn ask_path(&mut self, message: &str, kind: PathKind) -> Result<PathBuf>;

    /// Returns the index of the chosen entry in `choices`.
    fn ask_choice(&mut self, message: &str, choices: &[&str]) -> Result<usize>;

    fn ask_color(&mut self, message: &str) -> Result<Rgb>;

    fn ask_gradient(&mut self, message: &str) -> Result<Gradient>;

    /// Answers above 1 are read as percentages.
    fn ask_ratio(&mut self, message: &str, default: f32) -> Result<f32>;

    fn ask_confirmation(&mut self, message: &str) -> Result<bool>;
}

/// Line based prompts on a terminal (or any reader/writer pair).
///
/// Invalid answers are reported and asked again.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self, question: &str) -> Result<String> {
        write!(self.output, "? {question} ").map_err(Error::Prompt)?;
        self.output.flush().map_err(Error::Prompt)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(Error::Prompt)?;
        if read == 0 {
            return Err(Error::Prompt(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            )));
        }
        Ok(line.trim().to_string())
    }

    /// Ask until `parse` accepts the answer.
    fn ask_until<T>(
        &mut self,
        question: &str,
        mut parse: impl FnMut(&str) -> std::result::Result<T, String>,
    ) -> Result<T> {
        loop {
            let answer = self.read_answer(question)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(reason) => writeln!(self.output, "  ✗ {reason}").map_err(Error::Prompt)?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask_path(&mut self, message: &str, kind: PathKind) -> Result<PathBuf> {
        let cwd = std::env::current_dir().map_err(Error::Prompt)?;
        self.ask_until(&format!("{message}:"), |answer| {
            if answer.is_empty() {
                return Err("a path is required".to_string());
            }
            let path = cwd.join(answer);
            let ok = match kind {
                PathKind::File => path.is_file(),
                PathKind::Directory => path.is_dir(),
            };
            if ok {
                Ok(path)
            } else {
                let expected = match kind {
                    PathKind::File => "file",
                    PathKind::Directory => "directory",
                };
                Err(format!("not a {expected}: {}", path.display()))
            }
        })
    }

    fn ask_choice(&mut self, message: &str, choices: &[&str]) -> Result<usize> {
        let listed = choices
            .iter()
            .enumerate()
            .map(|(i, choice)| format!("{}) {choice}", i + 1))
            .collect::<Vec<_>>()
            .join("  ");
        self.ask_until(&format!("{message} [{listed}]:"), |answer| {
            if let Ok(n) = answer.parse::<usize>() {
                if (1..=choices.len()).contains(&n) {
                    return Ok(n - 1);
                }
            }
            choices
                .iter()
                .position(|choice| choice.eq_ignore_ascii_case(answer))
                .ok_or_else(|| format!("pick one of 1..{}", choices.len()))
        })
    }

    fn ask_color(&mut self, message: &str) -> Result<Rgb> {
        self.ask_until(&format!("{message} (hex):"), |answer| {
            parse_hex_color(answer).map_err(|err| err.to_string())
        })
    }

    fn ask_gradient(&mut self, message: &str) -> Result<Gradient> {
        writeln!(self.output, "? {message}").map_err(Error::Prompt)?;
        let color1 = self.ask_color("  first color")?;
        let color2 = self.ask_color("  second color")?;
        let angle = self.ask_until("  angle in degrees (-360..360):", |answer| {
            answer
                .parse::<i32>()
                .map_err(|_| format!("not a whole number: {answer:?}"))
        })?;
        Ok(Gradient::new(color1, color2, angle))
    }

    fn ask_ratio(&mut self, message: &str, default: f32) -> Result<f32> {
        self.ask_until(&format!("{message} ({default}):"), |answer| {
            if answer.is_empty() {
                return Ok(default);
            }
            let ratio = answer
                .parse::<f32>()
                .map(normalize_ratio)
                .map_err(|_| format!("not a number: {answer:?}"))?;
            if ratio > 0.0 && ratio <= 1.0 {
                Ok(ratio)
            } else {
                Err("ratio must be in (0, 1], or a percentage".to_string())
            }
        })
    }

    fn ask_confirmation(&mut self, message: &str) -> Result<bool> {
        self.ask_until(&format!("{message} (Y/n):"), |answer| {
            match answer.to_ascii_lowercase().as_str() {
                "" | "y" | "yes" => Ok(true),
                "n" | "no" => Ok(false),
                _ => Err("answer y or n".to_string()),
            }
        })
    }
}

/// Refuses every question; used with `--no-prompt`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn ask_path(&mut self, message: &str, _kind: PathKind) -> Result<PathBuf> {
        Err(Error::MissingValue(message.to_string()))
    }

    fn ask_choice(&mut self, message: &str, _choices: &[&str]) -> Result<usize> {
        Err(Error::MissingValue(message.to_string()))
    }

    fn ask_color(&mut self, message: &str) -> Result<Rgb> {
        Err(Error::MissingValue(message.to_string()))
    }

    fn ask_gradient(&mut self, message: &str) -> Result<Gradient> {
        Err(Error::MissingValue(message.to_string()))
    }

    fn ask_ratio(&mut self, message: &str, _default: f32) -> Result<f32> {
        Err(Error::MissingValue(message.to_string()))
    }

    fn ask_confirmation(&mut self, message: &str) -> Result<bool> {
        Err(Error::MissingValue(message.to_string()))
    }
}
