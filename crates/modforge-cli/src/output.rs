//! Terminal output for command handlers.
//!
//! Two channels exist. *Results* (`data`, `json`) always go to stdout and
//! survive `--quiet`. *Status* lines (`success`, `info`, headers) are muted
//! by `--quiet` and move to stderr under `--output-format json`.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::{OwoColorize, Style};
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Info,
    Heading,
}

impl Tone {
    fn marker(self) -> Option<&'static str> {
        match self {
            Tone::Success => Some("\u{2713}"),
            Tone::Warning => Some("\u{26a0}"),
            Tone::Info => Some("\u{2139}"),
            Tone::Heading => None,
        }
    }

    fn style(self) -> Style {
        match self {
            Tone::Success => Style::new().green(),
            Tone::Warning => Style::new().yellow(),
            Tone::Info => Style::new().blue(),
            Tone::Heading => Style::new().cyan().bold(),
        }
    }
}

pub struct OutputManager {
    format: OutputFormat,
    quiet: bool,
    color: bool,
    results: Term,
    status: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let format = resolve_format(args.output_format, io::stdout().is_terminal());
        let status = if format == OutputFormat::Json {
            Term::stderr()
        } else {
            Term::stdout()
        };

        Self {
            format,
            quiet: args.quiet,
            color: !config.no_color && format == OutputFormat::Human,
            results: Term::stdout(),
            status,
        }
    }

    /// Unstyled status text.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.status.write_line(msg)
    }

    /// A result line that scripts may capture.
    pub fn data(&self, msg: &str) -> io::Result<()> {
        self.results.write_line(msg)
    }

    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.results.write_line(&text)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.announce(Tone::Success, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.announce(Tone::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.announce(Tone::Info, msg)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        self.announce(Tone::Heading, text)
    }

    fn announce(&self, tone: Tone, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.status.write_line(&self.decorate(tone, msg))
    }

    fn decorate(&self, tone: Tone, msg: &str) -> String {
        let line = match tone.marker() {
            Some(marker) => format!("{marker} {msg}"),
            None => msg.to_owned(),
        };
        if self.color {
            line.style(tone.style()).to_string()
        } else {
            line
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// A person is at the keyboard: human format with stdin on a terminal.
    pub fn is_interactive(&self) -> bool {
        self.format == OutputFormat::Human && io::stdin().is_terminal()
    }
}

fn resolve_format(requested: OutputFormat, stdout_is_tty: bool) -> OutputFormat {
    match requested {
        OutputFormat::Auto if stdout_is_tty => OutputFormat::Human,
        OutputFormat::Auto => OutputFormat::Plain,
        explicit => explicit,
    }
}
