//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod amount;
pub mod completions;
pub mod gateway;
pub mod label;
pub mod reveal;
pub mod serve;
pub mod version;

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{AmountSubcommand, Cli, Commands};
use crate::config::{AppConfig, ConfigLoader, LoadWarning};
use crate::error::DeedRevealError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the dispatched
/// command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), DeedRevealError> {
    let config_path = cli.config.as_deref();

    match &cli.command {
        Commands::Reveal(args) => reveal::run(args, load_config(config_path)?).await,
        Commands::Amount(cmd) => {
            let config = load_config(config_path)?;
            match &cmd.subcommand {
                AmountSubcommand::Parse(args) => amount::parse(args, &config),
                AmountSubcommand::Format(args) => amount::format(args, &config),
                AmountSubcommand::Sanitize(args) => {
                    amount::sanitize(args);
                    Ok(())
                }
                AmountSubcommand::Check(args) => amount::check(args, &config),
            }
        }
        Commands::Gateway(args) => gateway::run(args, load_config(config_path)?),
        Commands::Label(args) => label::run(args),
        Commands::Serve(args) => serve::run(args, load_config(config_path)?, cancel).await,
        Commands::Completions(args) => completions::run(args),
        Commands::Version(args) => {
            version::run(args);
            Ok(())
        }
    }
}

/// Loads configuration, logging any warnings.
///
/// # Errors
///
/// Returns [`DeedRevealError::Config`] if loading or validation fails.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, DeedRevealError> {
    if let Some(path) = path {
        tracing::debug!(config = %path.display(), "loading configuration");
    }

    let result = ConfigLoader::new().load(path)?;
    log_warnings(&result.warnings);
    Ok(result.config)
}

/// Validates `config` again after command-line overrides.
///
/// # Errors
///
/// Returns [`DeedRevealError::Config`] if an override is invalid.
pub fn revalidate(config: &AppConfig) -> Result<(), DeedRevealError> {
    let warnings = crate::config::validate(config)?;
    log_warnings(&warnings);
    Ok(())
}

fn log_warnings(warnings: &[LoadWarning]) {
    for warning in warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
}
