//! Logging for `deedreveal`.
//!
//! Events go to stderr so reveal and amount output on stdout stays
//! pipeable. The default filter keeps dependency noise (hyper, reqwest)
//! one step quieter than the crate's own targets, and always lets the
//! server's startup and shutdown lines through.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable holding a full filter, replacing the flags.
pub const LOG_LEVEL_ENV: &str = "DEEDREVEAL_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON for machine consumption.
    Json,
}

/// Builds the default filter for the `-v`/`-q` flags.
///
/// | flags  | filter |
/// |--------|--------|
/// | `-q`   | errors only |
/// | none   | warnings, plus `deedreveal::server` at info |
/// | `-v`   | info everywhere |
/// | `-vv`  | debug for `deedreveal` crates, info for dependencies |
/// | `-vvv` | trace for `deedreveal` crates, debug for dependencies |
#[must_use]
pub fn filter_directives(verbosity: u8, quiet: bool) -> String {
    if quiet {
        return "error".to_string();
    }
    let (deps, own) = match verbosity {
        0 => return "warn,deedreveal::server=info".to_string(),
        1 => return "info".to_string(),
        2 => ("info", "debug"),
        _ => ("debug", "trace"),
    };
    format!("{deps},deedreveal={own},deedreveal_core={own}")
}

/// Resolves `--color` against the terminal and `NO_COLOR`.
#[must_use]
pub fn use_ansi(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    }
}

/// Installs the global subscriber.
///
/// `DEEDREVEAL_LOG_LEVEL`, when it parses, wins over the flags. A second
/// call is a no-op.
pub fn init_logging(format: LogFormat, verbosity: u8, quiet: bool, color: ColorChoice) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(verbosity, quiet)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Human => builder.with_ansi(use_ansi(color)).try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };
}
