//! Blocking client for the driftavbrott service.
//!
//! The service exposes one endpoint of interest:
//!
//! ```text
//! GET {base}/driftavbrott/pagaende?kanal=a&kanal=b&system=my-app&marginal=0
//! ```
//!
//! It answers 200 with an XML [`Driftavbrott`] when any of the channels has
//! an ongoing disruption, and 404 when none has. Everything else is a
//! failure.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::ACCEPT;

use crate::config::{ClientConfig, ConfigSource, EnvConfig, FileConfig};
use crate::error::{ConfigError, Error, RemoteErrorKind, RemoteServiceError, Result};
use crate::model::Driftavbrott;
use crate::observer::{Observer, TracingObserver};

/// Path of the ongoing-disruption endpoint, relative to the service URL.
pub const PAGAENDE_PATH: &str = "/driftavbrott/pagaende";

/// The service answers in XML, but some error statuses come back as JSON or HTML.
const ACCEPT_HEADER: &str = "application/xml, application/json;q=0.9, text/html;q=0.8";

/// Client for querying ongoing disruptions.
///
/// Cheap to clone; clones share the underlying HTTP connection pool. The
/// client holds no per-request state and can be used from many threads at
/// once.
#[derive(Clone)]
pub struct DisruptionClient {
    client: reqwest::blocking::Client,
    base_url: String,
    observer: Arc<dyn Observer>,
}

impl std::fmt::Debug for DisruptionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisruptionClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl DisruptionClient {
    /// Create a client from resolved settings.
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ConfigError> {
        // A redirect is an unexpected status, not something to follow.
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            base_url: config.service_url,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Create a client from any [`ConfigSource`].
    pub fn from_source(source: &dyn ConfigSource) -> std::result::Result<Self, ConfigError> {
        Self::new(ClientConfig::from_source(source)?)
    }

    /// Create a client from `DRIFTAVBROTT_*` environment variables.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::from_source(&EnvConfig::new())
    }

    /// Create a client from the configuration file found by [`FileConfig::locate`].
    pub fn from_config_file() -> std::result::Result<Self, ConfigError> {
        Self::from_source(&FileConfig::locate()?)
    }

    /// Report request outcomes to `observer` instead of `tracing`.
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    /// Base URL of the service this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the ongoing disruption for any of `channels`.
    ///
    /// Returns `Ok(None)` when the service reports no ongoing disruption.
    ///
    /// # Arguments
    ///
    /// * `channels` - Channels to check, in order of interest (must be non-empty)
    /// * `system` - Identifier of the calling system (must be non-blank)
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = DisruptionClient::from_env()?;
    /// if let Some(avbrott) = client.get_active_disruption(&["ladok"], "min-tjanst")? {
    ///     println!("{} until {}", avbrott.kanal, avbrott.slut);
    /// }
    /// ```
    pub fn get_active_disruption<S: AsRef<str>>(
        &self,
        channels: &[S],
        system: &str,
    ) -> Result<Option<Driftavbrott>> {
        self.get_active_disruption_with_margin(channels, system, 0)
    }

    /// Like [`get_active_disruption`](Self::get_active_disruption), but also
    /// reports disruptions starting or ending within `margin` minutes of now.
    pub fn get_active_disruption_with_margin<S: AsRef<str>>(
        &self,
        channels: &[S],
        system: &str,
        margin: u32,
    ) -> Result<Option<Driftavbrott>> {
        if channels.is_empty() {
            return Err(Error::InvalidRequest("at least one channel is required"));
        }
        if system.trim().is_empty() {
            return Err(Error::InvalidRequest("system identifier must not be blank"));
        }

        let url = build_request_url(&self.base_url, channels, system, margin);
        self.observer.request_started(&url);

        let response = match self.client.get(&url).header(ACCEPT, ACCEPT_HEADER).send() {
            Ok(response) => response,
            Err(e) => return Err(self.fail(channels, url, RemoteErrorKind::Transport(e))),
        };

        match response.status() {
            StatusCode::OK => {
                let body = match response.text() {
                    Ok(body) => body,
                    Err(e) => return Err(self.fail(channels, url, RemoteErrorKind::Transport(e))),
                };
                match Driftavbrott::from_xml(&body) {
                    Ok(disruption) => {
                        self.observer.disruption_found(&owned(channels), &disruption);
                        Ok(Some(disruption))
                    }
                    Err(e) => Err(self.fail(channels, url, RemoteErrorKind::Decode(e))),
                }
            }
            StatusCode::NOT_FOUND => {
                self.observer.no_disruption(&owned(channels));
                Ok(None)
            }
            status => Err(self.fail(channels, url, RemoteErrorKind::Status(status))),
        }
    }

    /// Build the error for a failed request and report it before returning.
    fn fail<S: AsRef<str>>(&self, channels: &[S], url: String, kind: RemoteErrorKind) -> Error {
        let err = RemoteServiceError {
            url,
            channels: owned(channels),
            kind,
        };
        self.observer.request_failed(&err);
        Error::RemoteService(err)
    }
}

fn owned<S: AsRef<str>>(channels: &[S]) -> Vec<String> {
    channels.iter().map(|c| c.as_ref().to_string()).collect()
}

/// Build the request URL for the ongoing-disruption endpoint.
///
/// One `kanal` parameter is emitted per channel, in the given order.
pub fn build_request_url<S: AsRef<str>>(
    base_url: &str,
    channels: &[S],
    system: &str,
    margin: u32,
) -> String {
    let mut url = format!("{}{}?", base_url.trim_end_matches('/'), PAGAENDE_PATH);

    for channel in channels {
        url.push_str(&format!("kanal={}&", urlencoding::encode(channel.as_ref())));
    }
    url.push_str(&format!(
        "system={}&marginal={}",
        urlencoding::encode(system),
        margin
    ));

    url
}
