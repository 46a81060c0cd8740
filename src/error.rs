//! Error types for the driftavbrott client.
//!
//! "No active disruption" is not an error: the service answers 404 and the
//! client turns that into `Ok(None)`.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for callers that want a single error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),

    #[error(transparent)]
    RemoteService(#[from] RemoteServiceError),
}

/// The client could not be constructed from its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file '{}' not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read configuration file '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file '{}'", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing required configuration key '{0}'")]
    MissingKey(String),

    #[error("invalid value for configuration key '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// The service could not give a definitive answer.
#[derive(Debug, Error)]
#[error("failed to fetch ongoing disruption for channels {channels:?} from {url}")]
pub struct RemoteServiceError {
    /// The request URL that was attempted.
    pub url: String,
    /// The channels the request was made for.
    pub channels: Vec<String>,
    #[source]
    pub kind: RemoteErrorKind,
}

impl RemoteServiceError {
    /// HTTP status returned by the service, if the exchange got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match &self.kind {
            RemoteErrorKind::Status(status) => Some(*status),
            RemoteErrorKind::Decode(_) => Some(StatusCode::OK),
            RemoteErrorKind::Transport(e) => e.status(),
        }
    }
}

/// What went wrong in the exchange with the service.
#[derive(Debug, Error)]
pub enum RemoteErrorKind {
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),

    #[error("response body could not be decoded")]
    Decode(#[source] quick_xml::DeError),

    #[error("unknown failure")]
    Transport(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_message_contains_url() {
        let err = RemoteServiceError {
            url: "http://localhost/driftavbrott/pagaende?kanal=a".to_string(),
            channels: vec!["a".to_string()],
            kind: RemoteErrorKind::Status(StatusCode::INTERNAL_SERVER_ERROR),
        };

        let message = err.to_string();
        assert!(message.contains("http://localhost/driftavbrott/pagaende?kanal=a"));
        assert!(message.contains("\"a\""));
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_config_error_converts() {
        let err: Error = ConfigError::MissingKey("service.url".to_string()).into();
        assert!(matches!(err, Error::Config(ConfigError::MissingKey(ref k)) if k == "service.url"));
        assert_eq!(
            err.to_string(),
            "missing required configuration key 'service.url'"
        );
    }
}
