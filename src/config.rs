//! Configuration for the driftavbrott client.
//!
//! The client needs at least the base URL of the driftavbrott service
//! (`service.url`). Settings are read through the [`ConfigSource`] trait so
//! callers can plug in whatever store they already have. Three sources ship
//! with the crate:
//!
//! - [`EnvConfig`]: environment variables (`DRIFTAVBROTT_SERVICE_URL`, ...)
//! - [`FileConfig`]: a TOML file, located via `DRIFTAVBROTT_CONFIG` or
//!   `driftavbrott.toml` in the working directory
//! - `HashMap<String, String>`: in-memory settings

use std::collections::HashMap;
use std::env::{self, VarError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Key holding the base URL of the driftavbrott service.
pub const SERVICE_URL_KEY: &str = "service.url";

/// Key holding the request timeout in seconds.
pub const TIMEOUT_KEY: &str = "service.timeout_secs";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default prefix for environment variables.
pub const DEFAULT_ENV_PREFIX: &str = "DRIFTAVBROTT";

/// Environment variable pointing at a configuration file.
pub const CONFIG_PATH_ENV: &str = "DRIFTAVBROTT_CONFIG";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "driftavbrott.toml";

/// A key-value store the client reads its settings from.
pub trait ConfigSource {
    /// Look up a dotted key such as `service.url`.
    ///
    /// `Ok(None)` means the key is not set. A key that is set to something
    /// unreadable is an error, not an absent key.
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError>;
}

impl<S: ConfigSource + ?Sized> ConfigSource for &S {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        (**self).get(key)
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(HashMap::get(self, key).cloned())
    }
}

/// Reads settings from environment variables.
///
/// `service.url` with the default prefix maps to `DRIFTAVBROTT_SERVICE_URL`.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    prefix: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_ENV_PREFIX)
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Name of the environment variable backing `key`.
    pub fn var_name(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key.replace(['.', '-'], "_")).to_uppercase()
    }
}

impl ConfigSource for EnvConfig {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let name = self.var_name(key);
        match env::var(&name) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                reason: format!("environment variable {name} is not valid unicode"),
            }),
        }
    }
}

/// Settings loaded from a TOML file.
///
/// Keys may be written dotted (`service.url = "..."`) or inside a table:
///
/// ```toml
/// [service]
/// url = "https://driftavbrott.example.se"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone)]
pub struct FileConfig {
    path: PathBuf,
    table: toml::Table,
}

impl FileConfig {
    /// Load settings from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let contents = fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound { path: path.clone() },
            _ => ConfigError::Io {
                path: path.clone(),
                source,
            },
        })?;
        Self::parse(path, &contents)
    }

    /// Load the configuration file named by `DRIFTAVBROTT_CONFIG`, falling
    /// back to `driftavbrott.toml` in the working directory.
    pub fn locate() -> Result<Self, ConfigError> {
        let path = env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load(path)
    }

    fn parse(path: PathBuf, contents: &str) -> Result<Self, ConfigError> {
        let table = contents
            .parse::<toml::Table>()
            .map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, table })
    }

    /// The file the settings were loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileConfig {
    fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let mut parts = key.split('.');
        let Some(mut value) = parts.next().and_then(|first| self.table.get(first)) else {
            return Ok(None);
        };
        for part in parts {
            match value.as_table().and_then(|table| table.get(part)) {
                Some(next) => value = next,
                None => return Ok(None),
            }
        }
        match value {
            toml::Value::String(s) => Ok(Some(s.clone())),
            toml::Value::Integer(i) => Ok(Some(i.to_string())),
            toml::Value::Float(f) => Ok(Some(f.to_string())),
            toml::Value::Boolean(b) => Ok(Some(b.to_string())),
            other => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                reason: format!(
                    "expected a scalar in '{}', found a {}",
                    self.path.display(),
                    other.type_str()
                ),
            }),
        }
    }
}

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the service, without trailing slash.
    pub service_url: String,
    /// Upper bound on a whole request, connect to last body byte.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings for the service at `service_url` with the default timeout.
    pub fn new(service_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            service_url: normalize_service_url(service_url)?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read settings from a [`ConfigSource`].
    ///
    /// Fails if `service.url` is missing or either value is malformed.
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let url = source
            .get(SERVICE_URL_KEY)?
            .ok_or_else(|| ConfigError::MissingKey(SERVICE_URL_KEY.to_string()))?;
        let mut config = Self::new(&url)?;

        if let Some(raw) = source.get(TIMEOUT_KEY)? {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: TIMEOUT_KEY.to_string(),
                reason: format!("'{raw}' is not a whole number of seconds"),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: TIMEOUT_KEY.to_string(),
                    reason: "timeout must be positive".to_string(),
                });
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn normalize_service_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key: SERVICE_URL_KEY.to_string(),
        reason,
    };

    let trimmed = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed).map_err(|e| invalid(format!("'{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    // The endpoint path and query are appended to the base URL verbatim.
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(format!("'{raw}' must not have a query or fragment")));
    }
    Ok(trimmed.to_string())
}
