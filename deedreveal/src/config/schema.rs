//! Configuration schema

use std::time::Duration;

use deedreveal_core::amount::DEFAULT_DECIMALS;
use deedreveal_core::media::DEFAULT_IPFS_GATEWAY;
use serde::{Deserialize, Serialize};

/// Default timeout for metadata requests.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default limit for a metadata document (1 MiB).
pub const DEFAULT_MAX_METADATA_BYTES: u64 = 1024 * 1024;

/// Default HTTP API bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Application configuration.
///
/// Every field has a default, so an empty mapping is a valid file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP gateway used to resolve `ipfs://` URIs
    pub gateway: String,

    /// Metadata request timeout, e.g. `"10s"` or `"1m 30s"`
    pub fetch_timeout: String,

    /// Largest accepted metadata document in bytes
    pub max_metadata_bytes: u64,

    /// Fractional digits of the marketplace stablecoin
    pub token_decimals: u8,

    /// Address the HTTP API binds to
    pub bind: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gateway: DEFAULT_IPFS_GATEWAY.to_string(),
            fetch_timeout: humantime::format_duration(DEFAULT_FETCH_TIMEOUT).to_string(),
            max_metadata_bytes: DEFAULT_MAX_METADATA_BYTES,
            token_decimals: DEFAULT_DECIMALS,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl AppConfig {
    /// Parsed request timeout.
    ///
    /// Falls back to [`DEFAULT_FETCH_TIMEOUT`] if the configured value does
    /// not parse; the loader rejects such values before this is reached.
    #[must_use]
    pub fn fetch_timeout_duration(&self) -> Duration {
        humantime::parse_duration(&self.fetch_timeout).unwrap_or(DEFAULT_FETCH_TIMEOUT)
    }
}
