use serde::{Deserialize, Serialize};

use crate::core::event::{ChainLink, Event, InformationGap};
use crate::error::TimelineResult;

/// Input dataset handed over by the data-loading collaborator.
///
/// Every array is optional: a missing track, link list, or gap list
/// deserializes as empty rather than failing the whole load. Field aliases
/// accept the legacy key names of the source export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TimelineDataset {
    #[serde(default, alias = "timeline_1_events")]
    pub primary_events: Vec<Event>,
    #[serde(default, alias = "timeline_2_swiss_view")]
    pub secondary_events: Vec<Event>,
    #[serde(default, alias = "timeline_3_microactions")]
    pub micro_events: Vec<Event>,
    #[serde(default, alias = "timeline_3_chain_links")]
    pub chain_links: Vec<ChainLink>,
    #[serde(default)]
    pub information_gaps: Vec<InformationGap>,
    #[serde(default)]
    pub statistics: Statistics,
}

impl TimelineDataset {
    /// Parses a dataset from its JSON export.
    ///
    /// A malformed document is a fatal load error; malformed individual
    /// fields (dates that do not parse, unknown enum values) degrade to
    /// defaults instead.
    pub fn from_json(raw: &str) -> TimelineResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn events(&self, track: super::event::TrackKind) -> &[Event] {
        match track {
            super::event::TrackKind::Primary => &self.primary_events,
            super::event::TrackKind::Secondary => &self.secondary_events,
            super::event::TrackKind::Micro => &self.micro_events,
        }
    }
}

/// Passive summary counters displayed by the host; never consumed by layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Statistics {
    #[serde(default, alias = "timeline_1_count")]
    pub primary_count: u32,
    #[serde(default, alias = "timeline_2_count")]
    pub secondary_count: u32,
    #[serde(default, alias = "timeline_3_count")]
    pub micro_count: u32,
    #[serde(default)]
    pub chain_links_count: u32,
    #[serde(default)]
    pub information_gaps_count: u32,
}

/// Lenient timestamp parsing: accepts a datetime, a bare date, or nothing.
///
/// An unparseable string maps to `None`; the owning event is then excluded
/// from geometry with a diagnostic instead of aborting the load.
pub(crate) mod lenient_datetime {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        let parsed = parse_timestamp(raw.trim());
        if parsed.is_none() && !raw.trim().is_empty() {
            tracing::debug!(value = %raw, "unparseable timestamp treated as missing");
        }
        Ok(parsed)
    }

    pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
        if raw.is_empty() {
            return None;
        }

        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}
