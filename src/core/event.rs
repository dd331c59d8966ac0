use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Evidentiary confidence attached to an event by the source corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Confidence {
    #[serde(rename = "high", alias = "#confidence/high")]
    High,
    #[serde(rename = "medium", alias = "#confidence/medium")]
    Medium,
    #[serde(rename = "low", alias = "#confidence/low")]
    Low,
    #[serde(other)]
    #[default]
    Unknown,
}

impl Confidence {
    /// Rank used by deduplication: higher wins.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Unknown => 0,
        }
    }
}

/// Precision of the recorded date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DatePrecision {
    Exact,
    Circa,
    Interval,
    OpenStart,
    OpenEnd,
    #[serde(other)]
    #[default]
    Unknown,
}

impl DatePrecision {
    /// Rank used by deduplication after confidence: higher wins.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Exact => 4,
            Self::Circa => 3,
            Self::OpenStart | Self::OpenEnd => 2,
            Self::Interval => 1,
            Self::Unknown => 0,
        }
    }

    /// Whisker half-width in days for the temporal-uncertainty bar.
    #[must_use]
    pub fn margin_days(self) -> f64 {
        match self {
            Self::Exact => 0.0,
            Self::Circa => 15.0,
            Self::Interval => 30.0,
            Self::OpenStart | Self::OpenEnd => 60.0,
            Self::Unknown => 90.0,
        }
    }
}

/// Free-form evidence classification carried through from the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct EvidenceClass(pub String);

impl EvidenceClass {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// True for evidence produced after the fact rather than contemporaneously.
    #[must_use]
    pub fn is_retrospective(&self) -> bool {
        self.0.contains("postwar_summary")
            || self.0.contains("postwar_testimony")
            || self.0.contains("administrative_review")
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rendering lane identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    /// Direct primary sources, deduplicated by identifier.
    Primary,
    /// Indirect institutional view, deduplicated by concept similarity.
    Secondary,
    /// Fine-grained actions, rendered exhaustively.
    Micro,
}

impl TrackKind {
    /// Lane caption shown in the track header.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "Primary sources",
            Self::Secondary => "Institutional view",
            Self::Micro => "Micro-actions",
        }
    }
}

/// One dated event from any track.
///
/// Immutable once loaded. Derived session flags live in an external table
/// (`layout::derived::DerivedFlags`), never on the event itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Event {
    #[serde(default, alias = "event_id", alias = "micro_id")]
    pub id: Option<String>,
    #[serde(default, alias = "date_start", with = "super::dataset::lenient_datetime")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, alias = "date_end", with = "super::dataset::lenient_datetime")]
    pub end: Option<NaiveDateTime>,
    #[serde(default, alias = "event_type")]
    pub kind: String,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default, alias = "date_precision")]
    pub precision: DatePrecision,
    #[serde(default, alias = "evidence_type")]
    pub evidence: EvidenceClass,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source_quote: Option<String>,
    #[serde(default, alias = "place_name")]
    pub place: Option<String>,
    #[serde(default, alias = "is_postwar_reconstruction")]
    pub postwar: bool,
}

impl Event {
    /// Start timestamp, falling back to the end timestamp for open-start records.
    #[must_use]
    pub fn effective_date(&self) -> Option<NaiveDateTime> {
        self.start.or(self.end)
    }

    /// Interval length in whole days when both endpoints are present.
    #[must_use]
    pub fn interval_days(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((end - start).num_days()),
            _ => None,
        }
    }

    /// True when the event has no usable timestamp and must be excluded
    /// from geometry computation.
    #[must_use]
    pub fn is_undated(&self) -> bool {
        self.effective_date().is_none()
    }
}

/// Directed cross-reference between two micro-track events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub from_id: String,
    pub to_id: String,
    #[serde(default)]
    pub link_type: LinkType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LinkType {
    #[serde(rename = "REPLY", alias = "REPLIES_TO")]
    Reply,
    #[serde(other, rename = "FOLLOWS")]
    #[default]
    Follows,
}

/// Declared low-activity interval, independent of individual events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformationGap {
    #[serde(default, alias = "start_date", with = "super::dataset::lenient_datetime")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, alias = "end_date", with = "super::dataset::lenient_datetime")]
    pub end: Option<NaiveDateTime>,
    #[serde(default)]
    pub severity: GapSeverity,
    #[serde(default)]
    pub duration_days: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GapSeverity {
    #[serde(rename = "HIGH")]
    High,
    #[serde(other, rename = "MODERATE")]
    #[default]
    Moderate,
}
