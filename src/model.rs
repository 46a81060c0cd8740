//! Data models for the driftavbrott service.
//!
//! The service answers `GET /driftavbrott/pagaende` with a single XML
//! document describing the disruption currently in effect for one of the
//! requested channels:
//!
//! ```xml
//! <driftavbrott xmlns="http://ns.mdh.se/driftavbrott/v1">
//!   <kanal>ladok.uppdatering</kanal>
//!   <start>2024-05-02T06:00:00</start>
//!   <slut>2024-05-02T08:00:00</slut>
//!   <meddelandeSv>Ladok uppdateras.</meddelandeSv>
//!   <meddelandeEn>Ladok is being updated.</meddelandeEn>
//! </driftavbrott>
//! ```
//!
//! Times are kept as wall-clock times. The service may send them with or
//! without a UTC offset (`2024-05-02T06:00:00+02:00`); when an offset is
//! present the local time at that offset is kept.

use chrono::{DateTime, Duration, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// An ongoing operational disruption for a channel.
///
/// Returned by [`DisruptionClient`](crate::DisruptionClient) when the
/// service reports an active disruption. The record is immutable and owned
/// by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driftavbrott {
    /// The channel the disruption applies to.
    pub kanal: String,

    /// When the disruption starts (service local time).
    #[serde(deserialize_with = "deserialize_date_time")]
    pub start: NaiveDateTime,

    /// When the disruption is expected to end (service local time).
    #[serde(deserialize_with = "deserialize_date_time")]
    pub slut: NaiveDateTime,

    /// Message to show Swedish-speaking users.
    #[serde(default, rename = "meddelandeSv")]
    pub meddelande_sv: Option<String>,

    /// Message to show English-speaking users.
    #[serde(default, rename = "meddelandeEn")]
    pub meddelande_en: Option<String>,
}

impl Driftavbrott {
    /// Parse a record from the service's XML representation.
    pub fn from_xml(xml: &str) -> Result<Self, quick_xml::DeError> {
        quick_xml::de::from_str(xml)
    }

    /// Planned length of the disruption.
    pub fn duration(&self) -> Duration {
        self.slut - self.start
    }

    /// Whether the disruption is in effect at `at`.
    ///
    /// The margin widens the window on both ends: a disruption starting
    /// within `margin_minutes` after `at`, or that ended within
    /// `margin_minutes` before it, still counts as ongoing.
    pub fn is_ongoing_at(&self, at: NaiveDateTime, margin_minutes: u32) -> bool {
        let margin = Duration::minutes(i64::from(margin_minutes));
        self.start - margin <= at && at <= self.slut + margin
    }

    /// The message in the requested language, falling back to the other one.
    pub fn message(&self, language: Language) -> Option<&str> {
        let (preferred, fallback) = match language {
            Language::Swedish => (&self.meddelande_sv, &self.meddelande_en),
            Language::English => (&self.meddelande_en, &self.meddelande_sv),
        };
        preferred.as_deref().or(fallback.as_deref())
    }
}

/// Parse an `xsd:dateTime`, with or without offset.
fn deserialize_date_time<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.naive_local());
    }
    raw.parse::<NaiveDateTime>()
        .map_err(|e| serde::de::Error::custom(format!("invalid date-time '{raw}': {e}")))
}

/// Languages the service provides messages in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Swedish,
    English,
}
