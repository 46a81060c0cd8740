//! Observability hooks for the driftavbrott client.
//!
//! The client reports every request outcome to an [`Observer`]. Failures are
//! reported before the error is handed back to the caller, so the channel
//! set, URL and cause are recorded even if the caller drops the error.
//!
//! [`TracingObserver`] is the default and emits `tracing` events; install a
//! subscriber in the application to see them.

use std::error::Error as _;

use tracing::{debug, error, info};

use crate::error::RemoteServiceError;
use crate::model::Driftavbrott;

/// Receives request outcomes from a [`DisruptionClient`](crate::DisruptionClient).
pub trait Observer: Send + Sync {
    /// A request is about to be sent.
    fn request_started(&self, _url: &str) {}

    /// The service reported an ongoing disruption.
    fn disruption_found(&self, _channels: &[String], _disruption: &Driftavbrott) {}

    /// The service reported no ongoing disruption for any of the channels.
    fn no_disruption(&self, _channels: &[String]) {}

    /// The request failed; `error` carries the channels, URL and cause.
    fn request_failed(&self, error: &RemoteServiceError);
}

/// Logs request outcomes through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn request_started(&self, url: &str) {
        debug!(url = %url, "Fetching ongoing disruption");
    }

    fn disruption_found(&self, channels: &[String], disruption: &Driftavbrott) {
        info!(
            channels = ?channels,
            kanal = %disruption.kanal,
            start = %disruption.start,
            slut = %disruption.slut,
            "Ongoing disruption found"
        );
    }

    fn no_disruption(&self, channels: &[String]) {
        info!(channels = ?channels, "No ongoing disruption for any of the channels");
    }

    fn request_failed(&self, err: &RemoteServiceError) {
        // The transport error's own source (DNS, connect, timeout) is the useful part.
        let cause = err
            .kind
            .source()
            .map(|source| source.to_string())
            .unwrap_or_default();
        error!(
            channels = ?err.channels,
            url = %err.url,
            status = ?err.status(),
            error = %err.kind,
            cause = %cause,
            "Failed to fetch ongoing disruption"
        );
    }
}
