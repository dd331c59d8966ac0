use chrono::{Datelike, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::event::{Confidence, DatePrecision, Event};

/// Interval length above which an interval-dated record is treated as a
/// retrospective synthesis rather than a point-in-time report.
const SYNTHESIS_INTERVAL_DAYS: i64 = 180;

/// Wording that marks a medium-confidence record as a forward-looking
/// announcement of an event confirmed by a later record on the same date.
const PROSPECTIVE_TERMS: [&str; 4] = ["soll", "devrait", "prévu", "prévue"];

/// Host-supplied vocabulary for first-confirmation detection.
///
/// `subject_terms` select the reports confirming a subject (for example a
/// detention site); `onset_terms` select the event opening the period of
/// ignorance. Both default to empty, which disables the detection: the
/// vocabulary is editorial data owned by the dataset, not by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConfirmationPolicy {
    pub subject_terms: Vec<String>,
    pub onset_terms: Vec<String>,
}

impl ConfirmationPolicy {
    #[must_use]
    pub fn new(subject_terms: Vec<String>, onset_terms: Vec<String>) -> Self {
        Self {
            subject_terms,
            onset_terms,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.subject_terms.is_empty() && !self.onset_terms.is_empty()
    }
}

/// Session flags derived once per dataset for one event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventFlags {
    /// The record is a long-span retrospective synthesis and is excluded
    /// from the normal stacked view.
    pub synthesis: Option<String>,
    /// Index of the announcing record when this event was announced ahead
    /// of time by a lower-confidence report on the same date.
    pub announced_by: Option<usize>,
    /// Set on the first report confirming the tracked subject after a
    /// period of ignorance; carries the onset reference for the band.
    pub confirmation: Option<ConfirmationRef>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfirmationRef {
    pub onset_index: usize,
    pub onset_date: NaiveDateTime,
}

/// Derived-attributes table keyed by event index.
///
/// Computed once per dataset load and never mutated by rendering code;
/// events themselves stay immutable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedFlags {
    flags: Vec<EventFlags>,
}

impl DerivedFlags {
    /// Empty table for tracks without derived semantics.
    #[must_use]
    pub fn empty(len: usize) -> Self {
        Self {
            flags: vec![EventFlags::default(); len],
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&EventFlags> {
        self.flags.get(index)
    }

    #[must_use]
    pub fn is_synthesis(&self, index: usize) -> bool {
        self.get(index).is_some_and(|f| f.synthesis.is_some())
    }

    #[must_use]
    pub fn is_announced(&self, index: usize) -> bool {
        self.get(index).is_some_and(|f| f.announced_by.is_some())
    }

    #[must_use]
    pub fn confirmation(&self, index: usize) -> Option<ConfirmationRef> {
        self.get(index).and_then(|f| f.confirmation)
    }

    /// Computes all derived flags for one track's events.
    #[must_use]
    pub fn compute(events: &[Event], policy: &ConfirmationPolicy) -> Self {
        let mut flags = vec![EventFlags::default(); events.len()];

        detect_synthesis(events, &mut flags);
        detect_announcements(events, &mut flags);
        detect_first_confirmation(events, policy, &mut flags);

        Self { flags }
    }
}

fn detect_synthesis(events: &[Event], flags: &mut [EventFlags]) {
    // Description mentions either an explicit month count or a multi-year
    // period; both suggest a summary record covering a long stretch.
    let month_span = Regex::new(r"(\d{2,3})\s*(?:mois|months)").expect("static pattern");
    let year_span = Regex::new(r"(19\d{2})\D*(19\d{2})").expect("static pattern");

    for (index, event) in events.iter().enumerate() {
        if event.precision == DatePrecision::Interval {
            if let Some(days) = event.interval_days() {
                if days > SYNTHESIS_INTERVAL_DAYS {
                    let months = days as f64 / 30.0;
                    tracing::debug!(index, months, "long interval flagged as synthesis");
                    flags[index].synthesis = Some(format!("interval spans {months:.1} months"));
                    continue;
                }
            }
        }

        if !event.evidence.is_retrospective() {
            continue;
        }

        let description = event.description.to_lowercase();
        if let Some(caps) = month_span.captures(&description) {
            if let Ok(months) = caps[1].parse::<u32>() {
                if months >= 12 {
                    tracing::debug!(index, months, "month-count mention flagged as synthesis");
                    flags[index].synthesis = Some(format!("description covers {months} months"));
                    continue;
                }
            }
        }

        if let Some(caps) = year_span.captures(&description) {
            let first: i32 = caps[1].parse().unwrap_or(0);
            let second: i32 = caps[2].parse().unwrap_or(0);
            let event_year = event.effective_date().map(|d| d.year());
            if second - first >= 2 && event_year.is_some_and(|year| (year - second).abs() <= 1) {
                tracing::debug!(index, first, second, "year-span mention flagged as synthesis");
                flags[index].synthesis = Some(format!("description covers {first}-{second}"));
            }
        }
    }
}

fn detect_announcements(events: &[Event], flags: &mut [EventFlags]) {
    let mut by_date: IndexMap<Option<NaiveDate>, Vec<usize>> = IndexMap::new();
    for (index, event) in events.iter().enumerate() {
        by_date
            .entry(event.start.map(|ts| ts.date()))
            .or_default()
            .push(index);
    }

    for group in by_date.values() {
        let announcement = group.iter().copied().find(|&index| {
            let event = &events[index];
            if event.confidence != Confidence::Medium {
                return false;
            }
            let quote = event.source_quote.as_deref().unwrap_or("").to_lowercase();
            let description = event.description.to_lowercase();
            PROSPECTIVE_TERMS
                .iter()
                .any(|term| quote.contains(term) || description.contains(term))
        });

        if let Some(announcement_index) = announcement {
            for &index in group {
                if events[index].confidence == Confidence::High {
                    flags[index].announced_by = Some(announcement_index);
                }
            }
        }
    }
}

fn detect_first_confirmation(
    events: &[Event],
    policy: &ConfirmationPolicy,
    flags: &mut [EventFlags],
) {
    if !policy.is_enabled() {
        return;
    }

    let mentions = |event: &Event, terms: &[String]| {
        let description = event.description.to_lowercase();
        terms.iter().any(|term| description.contains(&term.to_lowercase()))
    };

    // Confirmations must be contemporaneous reports; retrospective evidence
    // and long summary intervals describe the period, they do not confirm it.
    let mut confirmations: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, event)| {
            if !mentions(event, &policy.subject_terms) || event.evidence.is_retrospective() {
                return false;
            }
            if event.precision == DatePrecision::Interval
                && event
                    .interval_days()
                    .is_some_and(|days| days > SYNTHESIS_INTERVAL_DAYS)
            {
                return false;
            }
            event.effective_date().is_some()
        })
        .map(|(index, _)| index)
        .collect();
    confirmations.sort_by_key(|&index| events[index].effective_date());

    let mut onsets: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, event)| mentions(event, &policy.onset_terms) && event.effective_date().is_some())
        .map(|(index, _)| index)
        .collect();
    onsets.sort_by_key(|&index| events[index].effective_date());

    let (Some(&confirmation), Some(&onset)) = (confirmations.first(), onsets.first()) else {
        tracing::debug!(
            confirmations = confirmations.len(),
            onsets = onsets.len(),
            "first-confirmation detection found insufficient events"
        );
        return;
    };

    let onset_date = events[onset].effective_date();
    let confirmation_date = events[confirmation].effective_date();
    match (onset_date, confirmation_date) {
        (Some(start), Some(end)) if start < end => {
            tracing::debug!(%start, %end, "epistemic uncertainty span detected");
            flags[confirmation].confirmation = Some(ConfirmationRef {
                onset_index: onset,
                onset_date: start,
            });
        }
        _ => {
            tracing::debug!("onset does not precede first confirmation; no span");
        }
    }
}
