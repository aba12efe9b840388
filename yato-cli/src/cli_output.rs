// ABOUTME: Centralized CLI output utilities for consistent user-facing messages
// ABOUTME: Status lines go to stderr so that stdout carries only escape sequences and data

use owo_colors::OwoColorize;
use std::io::IsTerminal;

pub struct CliOutput {
    use_color: bool,
}

impl CliOutput {
    /// Color when stderr is a terminal, `--no-color` is absent, and `NO_COLOR` is unset
    pub fn from_flags(no_color: bool) -> Self {
        let use_color =
            !no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
        Self { use_color }
    }

    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.label("error:", message, Tone::Error));
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.label("warning:", message, Tone::Warning));
    }

    pub fn success(&self, message: &str) {
        eprintln!("{}", self.label("success:", message, Tone::Success));
    }

    /// `name: value` line on stdout, used by report-style commands
    pub fn field(&self, name: &str, value: &str) {
        println!("{}", self.format_field(name, value));
    }

    fn format_field(&self, name: &str, value: &str) -> String {
        if self.use_color {
            format!("{} {}", format!("{}:", name).bold(), value)
        } else {
            format!("{}: {}", name, value)
        }
    }

    fn label(&self, prefix: &str, message: &str, tone: Tone) -> String {
        if !self.use_color {
            return format!("{} {}", prefix, message);
        }
        let prefix = match tone {
            Tone::Error => prefix.red().bold().to_string(),
            Tone::Warning => prefix.yellow().bold().to_string(),
            Tone::Success => prefix.green().bold().to_string(),
        };
        format!("{} {}", prefix, message)
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Error,
    Warning,
    Success,
}
