use chrono::{NaiveDateTime, Timelike};

use crate::core::segment::DaySegment;
use crate::error::{TimelineError, TimelineResult};

/// Timestamp→x mapping over an ordered, contiguous day-segment list.
///
/// Monotonically non-decreasing for timestamps inside the covered range;
/// anything outside it clamps to the right edge of the last segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentAxis {
    segments: Vec<DaySegment>,
}

impl SegmentAxis {
    pub fn new(segments: Vec<DaySegment>) -> TimelineResult<Self> {
        if segments.is_empty() {
            return Err(TimelineError::InvalidData(
                "axis requires at least one segment".to_owned(),
            ));
        }
        for pair in segments.windows(2) {
            if pair[1].day <= pair[0].day {
                return Err(TimelineError::InvalidData(
                    "axis segments must be sorted by day".to_owned(),
                ));
            }
        }
        Ok(Self { segments })
    }

    #[must_use]
    pub fn segments(&self) -> &[DaySegment] {
        &self.segments
    }

    #[must_use]
    pub fn total_width(&self) -> f64 {
        self.segments.last().map_or(0.0, |seg| seg.x_end())
    }

    /// Maps a timestamp to its horizontal position.
    #[must_use]
    pub fn date_to_x(&self, ts: NaiveDateTime) -> f64 {
        let day = ts.date();
        if let Ok(index) = self.segments.binary_search_by(|seg| seg.day.cmp(&day)) {
            let segment = self.segments[index];
            let ratio = ts.num_seconds_from_midnight() as f64 / 86_400.0;
            return segment.x_start + ratio * segment.width;
        }

        // Days without events carry no axis space; clamp to the end edge.
        let last = self.segments[self.segments.len() - 1];
        last.x_end()
    }

    /// Rough pixels-per-day estimate used for day-denominated whiskers.
    ///
    /// Deliberately coarse: average segment width over an assumed 30-day
    /// cadence, matching how uncertainty margins were calibrated.
    #[must_use]
    pub fn px_per_day_estimate(&self) -> f64 {
        let total: f64 = self.segments.iter().map(|seg| seg.width).sum();
        let avg = total / self.segments.len() as f64;
        avg / 30.0
    }
}
