//! Diagnostics on stderr via `tracing-subscriber`.
//!
//! The library crates only emit events; this module installs the one
//! subscriber. `RUST_LOG`, when set, replaces the level chosen from
//! `-v`/`-q`. Under `--output-format json` the events are JSON objects too.

use std::io::{self, IsTerminal as _};

use tracing_subscriber::{EnvFilter, Layer as _, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    cli::{GlobalArgs, OutputFormat},
    error::{CliError, CliResult},
};

const CRATES: [&str; 3] = ["modforge", "modforge_core", "modforge_adapters"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LogSettings {
    level: &'static str,
    json: bool,
    ansi: bool,
}

impl LogSettings {
    fn from_args(args: &GlobalArgs, stderr_is_tty: bool) -> Self {
        let level = match (args.quiet, args.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, 2) => "debug",
            (false, _) => "trace",
        };
        let json = args.output_format == OutputFormat::Json;
        Self {
            level,
            json,
            ansi: !json && !args.no_color && stderr_is_tty,
        }
    }

    fn directives(&self) -> String {
        CRATES
            .iter()
            .map(|krate| format!("{krate}={}", self.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the global subscriber. Fails when one is already set.
pub fn init_logging(args: &GlobalArgs) -> CliResult<()> {
    let settings = LogSettings::from_args(args, io::stderr().is_terminal());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.directives()));

    let events = if settings.json {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_ansi(settings.ansi)
            .with_writer(io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(events.with_filter(filter))
        .try_init()
        .map_err(|e| CliError::IoError {
            message: "installing the log subscriber".into(),
            source: io::Error::other(e),
        })
}
