//! `gateway` command

use deedreveal_core::media::ipfs_to_http_with_gateway;

use crate::cli::args::GatewayArgs;
use crate::cli::commands::revalidate;
use crate::config::AppConfig;
use crate::error::DeedRevealError;

/// Prints the HTTP URL for a URI.
///
/// # Errors
///
/// Returns [`DeedRevealError::Config`] if `--gateway` is not an
/// `http(s)://` URL.
pub fn run(args: &GatewayArgs, mut config: AppConfig) -> Result<(), DeedRevealError> {
    if let Some(gateway) = &args.gateway {
        config.gateway.clone_from(gateway);
        revalidate(&config)?;
    }
    println!("{}", ipfs_to_http_with_gateway(&args.uri, &config.gateway));
    Ok(())
}
