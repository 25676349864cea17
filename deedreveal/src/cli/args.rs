//! CLI argument definitions
//!
//! All Clap derive structs for `deedreveal` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use deedreveal_core::RevealMode;

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Phased metadata reveal for real-estate auction listings.
#[derive(Parser, Debug)]
#[command(name = "deedreveal", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "DEEDREVEAL_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "DEEDREVEAL_LOG_FORMAT")]
    pub log_format: LogFormatArg,

    /// Path to YAML configuration file.
    #[arg(short, long, global = true, env = "DEEDREVEAL_CONFIG")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show which sections of a listing are visible at a phase.
    Reveal(RevealArgs),

    /// Parse, format and check stablecoin amounts.
    Amount(AmountCommand),

    /// Rewrite an `ipfs://` URI to a gateway URL.
    Gateway(GatewayArgs),

    /// Print display labels for media keys.
    Label(LabelArgs),

    /// Start the HTTP API.
    Serve(ServeArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version and build information.
    Version(VersionArgs),
}

// ============================================================================
// Reveal
// ============================================================================

/// Arguments for `reveal`.
#[derive(Args, Debug)]
pub struct RevealArgs {
    /// Metadata location: file path, `http(s)://` URL or `ipfs://` URI.
    pub source: String,

    /// Current auction phase (out-of-range values are clamped).
    #[arg(short, long, allow_negative_numbers = true)]
    pub phase: i64,

    /// How locked sections are shown.
    #[arg(short, long, default_value = "redacted")]
    pub mode: RevealMode,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Gateway for `ipfs://` URIs, overriding configuration.
    #[arg(long)]
    pub gateway: Option<String>,

    /// Rewrite media and document URIs through the gateway.
    #[arg(long)]
    pub resolve: bool,

    /// Only show this section, e.g. `section_2`.
    #[arg(short, long)]
    pub section: Option<String>,
}

// ============================================================================
// Amount
// ============================================================================

/// Amount commands.
#[derive(Args, Debug)]
pub struct AmountCommand {
    /// Amount subcommand.
    #[command(subcommand)]
    pub subcommand: AmountSubcommand,
}

/// Amount subcommands.
#[derive(Subcommand, Debug)]
pub enum AmountSubcommand {
    /// Convert a human-entered amount to base units.
    Parse(AmountParseArgs),

    /// Render base units as a decimal amount.
    Format(AmountFormatArgs),

    /// Strip an input down to digits and one decimal point.
    Sanitize(AmountSanitizeArgs),

    /// Check that an amount can be transferred from a balance.
    Check(AmountCheckArgs),
}

/// Arguments for `amount parse`.
#[derive(Args, Debug)]
pub struct AmountParseArgs {
    /// Amount as typed, e.g. `$1,250.50`.
    pub input: String,

    /// Token decimals (defaults to configuration).
    #[arg(short, long)]
    pub decimals: Option<u8>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `amount format`.
#[derive(Args, Debug)]
pub struct AmountFormatArgs {
    /// Amount in base units.
    pub units: u128,

    /// Token decimals (defaults to configuration).
    #[arg(short, long)]
    pub decimals: Option<u8>,

    /// Truncate to this many fraction digits (at most 36) with thousands separators.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=36))]
    pub digits: Option<u8>,
}

/// Arguments for `amount sanitize`.
#[derive(Args, Debug)]
pub struct AmountSanitizeArgs {
    /// Raw input text.
    pub input: String,
}

/// Arguments for `amount check`.
#[derive(Args, Debug)]
pub struct AmountCheckArgs {
    /// Amount to transfer.
    pub amount: String,

    /// Available balance.
    #[arg(short, long)]
    pub balance: String,

    /// Token decimals (defaults to configuration).
    #[arg(short, long)]
    pub decimals: Option<u8>,
}

// ============================================================================
// Gateway / Label / Serve
// ============================================================================

/// Arguments for `gateway`.
#[derive(Args, Debug)]
pub struct GatewayArgs {
    /// URI to rewrite.
    pub uri: String,

    /// Gateway base URL, overriding configuration.
    #[arg(long)]
    pub gateway: Option<String>,
}

/// Arguments for `label`.
#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Media keys.
    #[arg(required = true)]
    pub keys: Vec<String>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address, overriding configuration.
    #[arg(long)]
    pub bind: Option<String>,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: clap_complete::Shell,

    /// Write the script to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Log format flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable lines.
    #[default]
    Human,
    /// Newline-delimited JSON.
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Human => Self::Human,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_args() {
        let cli = Cli::try_parse_from([
            "deedreveal",
            "reveal",
            "listing.json",
            "--phase",
            "2",
            "--mode",
            "full",
        ])
        .unwrap();

        let Commands::Reveal(args) = cli.command else {
            panic!("Expected RevealArgs");
        };
        assert_eq!(args.source, "listing.json");
        assert_eq!(args.phase, 2);
        assert_eq!(args.mode, RevealMode::Full);
        assert_eq!(args.format, OutputFormat::Human);
    }

    #[test]
    fn test_reveal_negative_phase() {
        let cli =
            Cli::try_parse_from(["deedreveal", "reveal", "x.json", "--phase", "-3"]).unwrap();
        let Commands::Reveal(args) = cli.command else {
            panic!("Expected RevealArgs");
        };
        assert_eq!(args.phase, -3);
        assert_eq!(args.mode, RevealMode::Redacted);
    }

    #[test]
    fn test_reveal_requires_phase() {
        assert!(Cli::try_parse_from(["deedreveal", "reveal", "x.json"]).is_err());
    }

    #[test]
    fn test_amount_subcommands() {
        for argv in [
            vec!["deedreveal", "amount", "parse", "$1,000.50"],
            vec!["deedreveal", "amount", "format", "1000500000", "--digits", "2"],
            vec!["deedreveal", "amount", "sanitize", "a1b.2.3"],
            vec!["deedreveal", "amount", "check", "10", "--balance", "20", "-d", "2"],
        ] {
            let cli = Cli::try_parse_from(argv.iter().copied());
            assert!(cli.is_ok(), "Failed to parse {argv:?}: {cli:?}");
        }
    }

    #[test]
    fn test_amount_format_digits_bounded() {
        let cli =
            Cli::try_parse_from(["deedreveal", "amount", "format", "1", "--digits", "36"]);
        assert!(cli.is_ok());
        for digits in ["37", "18446744073709551615", "-1"] {
            let err = Cli::try_parse_from(["deedreveal", "amount", "format", "1", "--digits", digits])
                .unwrap_err();
            assert_ne!(err.kind(), clap::error::ErrorKind::DisplayHelp, "digits={digits}");
        }
    }

    #[test]
    fn test_reveal_section_filter() {
        let cli = Cli::try_parse_from([
            "deedreveal", "reveal", "x.json", "-p", "1", "--section", "section_2",
        ])
        .unwrap();
        let Commands::Reveal(args) = cli.command else {
            panic!("Expected RevealArgs");
        };
        assert_eq!(args.section.as_deref(), Some("section_2"));
    }

    #[test]
    fn test_amount_check_requires_balance() {
        assert!(Cli::try_parse_from(["deedreveal", "amount", "check", "10"]).is_err());
    }

    #[test]
    fn test_label_requires_keys() {
        assert!(Cli::try_parse_from(["deedreveal", "label"]).is_err());
    }

    #[test]
    fn test_help_output() {
        let err = Cli::try_parse_from(["deedreveal", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let err = Cli::try_parse_from(["deedreveal", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "deedreveal",
            "gateway",
            "ipfs://bafy",
            "-vv",
            "--color",
            "never",
            "--log-format",
            "json",
            "--config",
            "deedreveal.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(LogFormat::from(cli.log_format), LogFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("deedreveal.yaml")));
    }

    #[test]
    fn test_completions_shells_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["deedreveal", "completions", shell]);
            assert!(cli.is_ok(), "Failed to parse shell={shell}");
        }
    }

    #[test]
    fn test_completions_output_path() {
        let cli = Cli::try_parse_from(["deedreveal", "completions", "zsh", "-o", "_deedreveal"])
            .unwrap();
        let Commands::Completions(args) = cli.command else {
            panic!("Expected CompletionsArgs");
        };
        assert_eq!(args.shell, clap_complete::Shell::Zsh);
        assert_eq!(args.output, Some(PathBuf::from("_deedreveal")));
    }
}
