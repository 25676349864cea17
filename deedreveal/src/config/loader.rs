//! Configuration loader
//!
//! Loading pipeline:
//! 1. Start from [`AppConfig::default`]
//! 2. Merge the YAML file, if one is given
//! 3. Apply `DEEDREVEAL_*` environment overrides
//! 4. Validate

use std::path::Path;

use deedreveal_core::amount::MAX_DECIMALS;

use crate::config::schema::AppConfig;
use crate::error::ConfigError;

/// Environment variable overriding [`AppConfig::gateway`].
pub const ENV_GATEWAY: &str = "DEEDREVEAL_GATEWAY";
/// Environment variable overriding [`AppConfig::fetch_timeout`].
pub const ENV_FETCH_TIMEOUT: &str = "DEEDREVEAL_FETCH_TIMEOUT";
/// Environment variable overriding [`AppConfig::max_metadata_bytes`].
pub const ENV_MAX_METADATA_BYTES: &str = "DEEDREVEAL_MAX_METADATA_BYTES";
/// Environment variable overriding [`AppConfig::token_decimals`].
pub const ENV_TOKEN_DECIMALS: &str = "DEEDREVEAL_TOKEN_DECIMALS";
/// Environment variable overriding [`AppConfig::bind`].
pub const ENV_BIND: &str = "DEEDREVEAL_BIND";

/// Largest configuration file the loader will read.
const MAX_CONFIG_SIZE: u64 = 64 * 1024;

/// Result of loading configuration.
#[derive(Debug)]
pub struct LoadResult {
    /// The validated configuration.
    pub config: AppConfig,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Field the warning is about.
    pub location: Option<String>,
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Configuration loader.
pub struct ConfigLoader {
    env: EnvLookup,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader").finish_non_exhaustive()
    }
}

impl ConfigLoader {
    /// Creates a loader that reads overrides from the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            env: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Creates a loader with a custom environment lookup.
    #[must_use]
    pub fn with_env(env: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self { env: Box::new(env) }
    }

    /// Loads, overrides and validates configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, too large or not valid
    /// YAML for [`AppConfig`], or if any value fails validation.
    pub fn load(&self, path: Option<&Path>) -> Result<LoadResult, ConfigError> {
        let mut config = match path {
            Some(path) => read_file(path)?,
            None => AppConfig::default(),
        };

        self.apply_env(&mut config)?;

        let warnings = validate(&config)?;
        Ok(LoadResult { config, warnings })
    }

    fn apply_env(&self, config: &mut AppConfig) -> Result<(), ConfigError> {
        if let Some(gateway) = (self.env)(ENV_GATEWAY) {
            config.gateway = gateway;
        }
        if let Some(timeout) = (self.env)(ENV_FETCH_TIMEOUT) {
            config.fetch_timeout = timeout;
        }
        if let Some(raw) = (self.env)(ENV_MAX_METADATA_BYTES) {
            config.max_metadata_bytes = parse_env(ENV_MAX_METADATA_BYTES, &raw, "a byte count")?;
        }
        if let Some(raw) = (self.env)(ENV_TOKEN_DECIMALS) {
            config.token_decimals = parse_env(ENV_TOKEN_DECIMALS, &raw, "an integer 0-255")?;
        }
        if let Some(bind) = (self.env)(ENV_BIND) {
            config.bind = bind;
        }
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
        path: path.to_path_buf(),
    })?;
    if metadata.len() > MAX_CONFIG_SIZE {
        return Err(ConfigError::InvalidValue {
            field: "file_size".to_string(),
            value: format!("{} bytes", metadata.len()),
            expected: format!("at most {MAX_CONFIG_SIZE} bytes"),
        });
    }

    let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
        path: path.to_path_buf(),
    })?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    if raw.trim().is_empty() {
        return Err(ConfigError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message: "Configuration file is empty".to_string(),
        });
    }

    serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })
}

fn parse_env<T: std::str::FromStr>(var: &str, raw: &str, expected: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: var.to_string(),
        value: raw.to_string(),
        expected: expected.to_string(),
    })
}

fn invalid(field: &str, value: impl ToString, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

/// Validates a merged configuration, returning non-fatal warnings.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for the first field out of range.
pub fn validate(config: &AppConfig) -> Result<Vec<LoadWarning>, ConfigError> {
    let mut warnings = Vec::new();

    if config.gateway.starts_with("http://") {
        warnings.push(LoadWarning {
            message: "gateway uses plain http".to_string(),
            location: Some("gateway".to_string()),
        });
    } else if !config.gateway.starts_with("https://") {
        return Err(invalid("gateway", &config.gateway, "an http:// or https:// URL"));
    }

    match humantime::parse_duration(&config.fetch_timeout) {
        Ok(timeout) if !timeout.is_zero() => {}
        _ => {
            return Err(invalid(
                "fetch_timeout",
                &config.fetch_timeout,
                "a non-zero duration such as \"10s\"",
            ));
        }
    }

    if config.max_metadata_bytes == 0 {
        return Err(invalid("max_metadata_bytes", 0, "a positive byte count"));
    }

    if config.token_decimals > MAX_DECIMALS {
        return Err(invalid(
            "token_decimals",
            config.token_decimals,
            &format!("at most {MAX_DECIMALS}"),
        ));
    }

    let port_ok = config
        .bind
        .rsplit_once(':')
        .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
    if !port_ok {
        return Err(invalid("bind", &config.bind, "host:port"));
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn loader_with(vars: &[(&str, &str)]) -> ConfigLoader {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ConfigLoader::with_env(move |name| vars.get(name).cloned())
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_file() {
        let result = loader_with(&[]).load(None).unwrap();
        assert_eq!(result.config, AppConfig::default());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn file_values_apply() {
        let file = write_config("gateway: https://gw.example/ipfs\nfetch_timeout: 3s\n");
        let result = loader_with(&[]).load(Some(file.path())).unwrap();
        assert_eq!(result.config.gateway, "https://gw.example/ipfs");
        assert_eq!(result.config.fetch_timeout_duration().as_secs(), 3);
    }

    #[test]
    fn env_overrides_file() {
        let file = write_config("token_decimals: 18\nbind: 0.0.0.0:8080\n");
        let loader = loader_with(&[
            (ENV_TOKEN_DECIMALS, "2"),
            (ENV_GATEWAY, "https://env.example/ipfs"),
        ]);
        let config = loader.load(Some(file.path())).unwrap().config;
        assert_eq!(config.token_decimals, 2);
        assert_eq!(config.gateway, "https://env.example/ipfs");
        assert_eq!(config.bind, "0.0.0.0:8080");
    }

    #[test]
    fn bad_env_value_is_rejected() {
        let err = loader_with(&[(ENV_MAX_METADATA_BYTES, "lots")])
            .load(None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == ENV_MAX_METADATA_BYTES));
    }

    #[test]
    fn missing_file() {
        let err = loader_with(&[])
            .load(Some(Path::new("/nonexistent/deedreveal.yaml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = write_config("  \n");
        let err = loader_with(&[]).load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn unknown_field_reports_parse_error() {
        let file = write_config("gateway: https://x\nretries: 3\n");
        let err = loader_with(&[]).load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn validation_rules() {
        for (var, value) in [
            (ENV_GATEWAY, "ftp://gw"),
            (ENV_FETCH_TIMEOUT, "0s"),
            (ENV_FETCH_TIMEOUT, "soon"),
            (ENV_MAX_METADATA_BYTES, "0"),
            (ENV_TOKEN_DECIMALS, "40"),
            (ENV_BIND, "3000"),
            (ENV_BIND, "localhost:http"),
        ] {
            let result = loader_with(&[(var, value)]).load(None);
            assert!(result.is_err(), "{var}={value} should be rejected");
        }
    }

    #[test]
    fn plain_http_gateway_warns() {
        let result = loader_with(&[(ENV_GATEWAY, "http://127.0.0.1:8080/ipfs")])
            .load(None)
            .unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].location.as_deref(), Some("gateway"));
    }

    #[test]
    fn validate_rechecks_overridden_values() {
        let mut config = AppConfig::default();
        assert!(validate(&config).unwrap().is_empty());

        config.gateway = "ftp://gw.example".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "gateway"
        ));

        config.gateway = "http://gw.local".to_string();
        assert_eq!(validate(&config).unwrap().len(), 1);

        config.bind = "no-port".to_string();
        assert!(validate(&config).is_err());
    }
}
