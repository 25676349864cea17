//! `serve` command

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::args::ServeArgs;
use crate::cli::commands::revalidate;
use crate::config::AppConfig;
use crate::error::DeedRevealError;
use crate::server::{self, AppState};

/// Runs the HTTP API until `cancel` fires.
///
/// # Errors
///
/// Returns a config error for a malformed `--bind`, or a server error if
/// the address cannot be bound or the server fails while running.
pub async fn run(
    args: &ServeArgs,
    mut config: AppConfig,
    cancel: CancellationToken,
) -> Result<(), DeedRevealError> {
    if let Some(bind) = &args.bind {
        config.bind.clone_from(bind);
        revalidate(&config)?;
    }

    let listener = server::bind(&config.bind).await?;
    let state = Arc::new(AppState::new(config)?);
    server::run(listener, state, cancel).await?;
    Ok(())
}
