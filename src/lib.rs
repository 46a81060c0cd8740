//! Driftavbrott client - look up ongoing operational disruptions per channel.
//!
//! # Overview
//!
//! A driftavbrott (operational disruption) service keeps track of planned and
//! unplanned outages for named channels. This crate asks it whether any of a
//! set of channels currently has an ongoing disruption:
//!
//! ```ignore
//! use driftavbrott_client::DisruptionClient;
//!
//! let client = DisruptionClient::from_env()?;
//! match client.get_active_disruption_with_margin(&["ladok", "canvas"], "min-tjanst", 15)? {
//!     Some(avbrott) => println!("{} is down until {}", avbrott.kanal, avbrott.slut),
//!     None => println!("all clear"),
//! }
//! ```
//!
//! "No ongoing disruption" is `Ok(None)`; only a failure to get a definitive
//! answer from the service is an error.
//!
//! # Modules
//!
//! - [`client`]: The blocking HTTP client
//! - [`config`]: Configuration sources and client settings
//! - [`model`]: The disruption record returned by the service
//! - [`observer`]: Hooks for logging request outcomes
//! - [`error`]: Error types

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod observer;

pub use client::DisruptionClient;
pub use config::{ClientConfig, ConfigSource, EnvConfig, FileConfig};
pub use error::{ConfigError, Error, RemoteErrorKind, RemoteServiceError, Result};
pub use model::{Driftavbrott, Language};
pub use observer::{Observer, TracingObserver};
