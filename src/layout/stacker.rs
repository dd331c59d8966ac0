use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::api::config::RenderOptions;
use crate::core::axis::SegmentAxis;
use crate::core::event::{DatePrecision, Event, TrackKind};
use crate::error::{TimelineError, TimelineResult};
use crate::layout::dedup::{ConceptVocabulary, dedup_by_id, dedup_by_similarity};
use crate::layout::derived::DerivedFlags;
use crate::layout::visual::{VisualConfig, VisualEncoding, encode};

/// Vertical stacking and track sizing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    /// Vertical distance between stacked markers sharing an x position.
    pub slot_height_px: f64,
    /// Distance from the track top to the first marker row.
    pub marker_row_offset_px: f64,
    pub min_track_height_px: f64,
    pub bottom_margin_px: f64,
    /// Assumed lead time of an announcement ahead of its confirmation.
    pub announcement_lead_days: f64,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            slot_height_px: 13.0,
            marker_row_offset_px: 30.0,
            min_track_height_px: 70.0,
            bottom_margin_px: 60.0,
            announcement_lead_days: 3.0,
        }
    }
}

impl StackConfig {
    pub fn validate(&self) -> TimelineResult<()> {
        for (value, name) in [
            (self.slot_height_px, "slot_height_px"),
            (self.marker_row_offset_px, "marker_row_offset_px"),
            (self.min_track_height_px, "min_track_height_px"),
            (self.bottom_margin_px, "bottom_margin_px"),
            (self.announcement_lead_days, "announcement_lead_days"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TimelineError::InvalidData(format!(
                    "stack config `{name}` must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

/// One event resolved to a marker position within its track.
///
/// Coordinates are relative to the track top; the engine offsets whole
/// tracks vertically when assembling the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEvent {
    /// Index into the track's source event array.
    pub index: usize,
    pub id: Option<String>,
    pub track: TrackKind,
    pub x: f64,
    pub y: f64,
    pub slot: usize,
    pub visual: VisualEncoding,
}

/// Interval-dated record rendered as a span instead of a point marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalSpan {
    pub index: usize,
    pub x_start: f64,
    pub x_end: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandKind {
    /// Announcement preceding its same-date confirmation.
    Announcement,
    /// Period of ignorance from an onset event to its first confirmation.
    Epistemic,
}

/// Horizontal uncertainty band attached to a stacked event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertaintyBand {
    pub kind: BandKind,
    pub index: usize,
    pub x_start: f64,
    pub x_end: f64,
    pub y: f64,
}

/// Centered whisker visualizing date-precision margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecisionWhisker {
    pub index: usize,
    pub x_start: f64,
    pub x_end: f64,
    pub y: f64,
}

/// Fully stacked geometry for one track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackLayout {
    pub track: TrackKind,
    pub placed: Vec<PlacedEvent>,
    pub intervals: Vec<IntervalSpan>,
    pub bands: Vec<UncertaintyBand>,
    pub whiskers: Vec<PrecisionWhisker>,
    pub max_stack: usize,
    pub height: f64,
}

impl TrackLayout {
    fn new(track: TrackKind) -> Self {
        Self {
            track,
            placed: Vec::new(),
            intervals: Vec::new(),
            bands: Vec::new(),
            whiskers: Vec::new(),
            max_stack: 0,
            height: 0.0,
        }
    }
}

/// Selects, deduplicates, and stacks one track's events.
pub fn stack_track(
    track: TrackKind,
    events: &[Event],
    axis: &SegmentAxis,
    options: &RenderOptions,
    derived: &DerivedFlags,
    vocabulary: &ConceptVocabulary,
    visual: &VisualConfig,
    config: &StackConfig,
) -> TimelineResult<TrackLayout> {
    config.validate()?;
    visual.validate()?;
    vocabulary.validate()?;

    let expand = options.expand_sources && track != TrackKind::Micro;

    // Selection and deduplication differ per track; expand mode shows the
    // undeduplicated source record set for the annotated tracks.
    let selected: Vec<usize> = if expand {
        (0..events.len()).collect()
    } else {
        match track {
            TrackKind::Primary => dedup_by_id(events),
            TrackKind::Secondary => dedup_by_similarity(events, vocabulary),
            TrackKind::Micro => (0..events.len()).collect(),
        }
    };

    let mut kept: Vec<usize> = Vec::with_capacity(selected.len());
    for index in selected {
        let event = &events[index];

        if event.is_undated() {
            tracing::debug!(?track, index, "event without usable timestamp excluded");
            continue;
        }

        if !expand {
            let retrospective = event.postwar
                || (track == TrackKind::Secondary && event.evidence.is_retrospective());
            if track != TrackKind::Micro && retrospective && !options.show_postwar {
                continue;
            }
            if track == TrackKind::Secondary && derived.is_synthesis(index) {
                tracing::debug!(index, "synthesis record excluded from stacked view");
                continue;
            }
        }

        if event.precision == DatePrecision::Interval {
            match track {
                // Point markers for long intervals mislead; the primary and
                // micro tracks drop them entirely.
                TrackKind::Primary | TrackKind::Micro => continue,
                TrackKind::Secondary => {
                    if !options.show_uncertainty {
                        continue;
                    }
                }
            }
        }

        kept.push(index);
    }

    // Group by rounded pixel position, preserving first-arrival order.
    let mut groups: IndexMap<i64, SmallVec<[usize; 4]>> = IndexMap::new();
    for &index in &kept {
        let Some(ts) = events[index].effective_date() else {
            continue;
        };
        let x = axis.date_to_x(ts).round() as i64;
        groups.entry(x).or_default().push(index);
    }

    // Retrospective entries stack above contemporaneous ones at the same
    // position, keeping the primary reading uncluttered.
    if track == TrackKind::Secondary {
        for group in groups.values_mut() {
            group.sort_by_key(|&index| {
                let event = &events[index];
                event.postwar || event.evidence.is_retrospective()
            });
        }
    }

    let px_per_day = axis.px_per_day_estimate();
    let mut layout = TrackLayout::new(track);

    for (&x, group) in &groups {
        let x = x as f64;
        for (slot, &index) in group.iter().enumerate() {
            let event = &events[index];
            let y = config.marker_row_offset_px + slot as f64 * config.slot_height_px;

            if event.precision == DatePrecision::Interval {
                // Reaching this point means secondary + show_uncertainty.
                if let (Some(start), Some(end)) = (event.start, event.end) {
                    layout.intervals.push(IntervalSpan {
                        index,
                        x_start: axis.date_to_x(start),
                        x_end: axis.date_to_x(end),
                        y,
                    });
                }
                layout.max_stack = layout.max_stack.max(slot + 1);
                continue;
            }

            if track == TrackKind::Secondary && options.show_uncertainty {
                if slot == 0 && derived.is_announced(index) {
                    let lead = config.announcement_lead_days * px_per_day;
                    layout.bands.push(UncertaintyBand {
                        kind: BandKind::Announcement,
                        index,
                        x_start: x - lead,
                        x_end: x,
                        y,
                    });
                }
                if let Some(confirmation) = derived.confirmation(index) {
                    layout.bands.push(UncertaintyBand {
                        kind: BandKind::Epistemic,
                        index,
                        x_start: axis.date_to_x(confirmation.onset_date),
                        x_end: x,
                        y,
                    });
                }
            }

            let retrospective = event.postwar || event.evidence.is_retrospective();
            if track != TrackKind::Secondary
                && slot == 0
                && event.precision != DatePrecision::Exact
                && !retrospective
                && !derived.is_announced(index)
            {
                let half = event.precision.margin_days() * px_per_day;
                if half > 0.0 {
                    layout.whiskers.push(PrecisionWhisker {
                        index,
                        x_start: x - half,
                        x_end: x + half,
                        y: y + 3.0,
                    });
                }
            }

            layout.placed.push(PlacedEvent {
                index,
                id: event.id.clone(),
                track,
                x,
                y,
                slot,
                visual: encode(event, track, visual),
            });
            layout.max_stack = layout.max_stack.max(slot + 1);
        }
    }

    layout.height = config.min_track_height_px.max(
        layout.max_stack as f64 * config.slot_height_px + config.bottom_margin_px,
    );
    Ok(layout)
}
