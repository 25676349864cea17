//! Metadata retrieval
//!
//! Resolves a metadata source (local file, `ipfs://` URI or HTTP URL),
//! downloads it with a size cap and hands the bytes to the tolerant core
//! parser. This is the only place where listing metadata touches the
//! network.

use std::fmt;
use std::path::{Path, PathBuf};

use deedreveal_core::ParsedMetadata;
use deedreveal_core::media::{ipfs_to_http_with_gateway, is_content_addressed};
use deedreveal_core::metadata::AuctionMetadata;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::FetchError;

/// Where a metadata document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataSource {
    /// Plain `http://` or `https://` URL
    Url(String),
    /// `ipfs://` URI, resolved through the configured gateway
    Ipfs(String),
    /// Local file
    File(PathBuf),
}

impl MetadataSource {
    /// Classifies a source string. Anything that is not a URL is a path.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        let lower = trimmed.to_ascii_lowercase();
        if is_content_addressed(trimmed) {
            Self::Ipfs(trimmed.to_string())
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    /// Whether retrieving this source touches the network.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_) | Self::Ipfs(_))
    }
}

impl fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) | Self::Ipfs(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Downloads and parses listing metadata.
#[derive(Debug, Clone)]
pub struct MetadataFetcher {
    client: reqwest::Client,
    gateway: String,
    max_bytes: u64,
}

impl MetadataFetcher {
    /// Creates a fetcher from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout_duration())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            gateway: config.gateway.clone(),
            max_bytes: config.max_metadata_bytes,
        })
    }

    /// Gateway used for `ipfs://` sources.
    #[must_use]
    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    /// HTTP URL a remote source is fetched from.
    #[must_use]
    pub fn resolve_url(&self, source: &MetadataSource) -> Option<String> {
        match source {
            MetadataSource::Url(url) => Some(url.clone()),
            MetadataSource::Ipfs(uri) => Some(ipfs_to_http_with_gateway(uri, &self.gateway)),
            MetadataSource::File(_) => None,
        }
    }

    /// Retrieves and parses a metadata document.
    ///
    /// Items the parser drops are logged at `warn` and returned in
    /// [`ParsedMetadata::skipped`].
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the document cannot be read, exceeds
    /// the size limit, or is not a JSON object.
    pub async fn fetch(&self, source: &MetadataSource) -> Result<ParsedMetadata, FetchError> {
        let bytes = match source {
            MetadataSource::File(path) => self.read_file(path).await?,
            MetadataSource::Url(_) | MetadataSource::Ipfs(_) => {
                let url = self.resolve_url(source).unwrap_or_default();
                self.download(&url).await?
            }
        };

        let parsed = AuctionMetadata::from_json_slice(&bytes)?;
        for item in &parsed.skipped {
            warn!(
                source = %source,
                location = %item.location,
                reason = %item.reason,
                "skipped metadata item"
            );
        }
        debug!(
            source = %source,
            items = parsed.metadata.item_count(),
            skipped = parsed.skipped.len(),
            "metadata parsed"
        );
        Ok(parsed)
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FetchError> {
        let meta = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                FetchError::Read {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        if meta.len() > self.max_bytes {
            return Err(FetchError::TooLarge {
                size: meta.len(),
                limit: self.max_bytes,
            });
        }

        tokio::fs::read(path).await.map_err(|source| FetchError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!(%url, "fetching metadata");
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let mut response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes {
                return Err(FetchError::TooLarge {
                    size: len,
                    limit: self.max_bytes,
                });
            }
        }

        // Content-Length may be absent or wrong; enforce the cap while streaming.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(request_error)? {
            let size = u64::try_from(body.len() + chunk.len()).unwrap_or(u64::MAX);
            if size > self.max_bytes {
                return Err(FetchError::TooLarge {
                    size,
                    limit: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}
