use chrono::NaiveDateTime;

use crate::core::axis::SegmentAxis;
use crate::core::event::{GapSeverity, InformationGap};

/// One information gap resolved to a horizontal band.
///
/// Bands span the full track area vertically; the host decides the height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapBand {
    pub x: f64,
    pub width: f64,
    pub severity: GapSeverity,
    pub duration_days: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Maps declared gaps onto the axis. Records with unusable dates are
/// skipped with a diagnostic; one bad record never affects the others.
#[must_use]
pub fn gap_bands(gaps: &[InformationGap], axis: &SegmentAxis) -> Vec<GapBand> {
    let mut bands = Vec::with_capacity(gaps.len());
    for (index, gap) in gaps.iter().enumerate() {
        let (Some(start), Some(end)) = (gap.start, gap.end) else {
            tracing::warn!(index, "information gap with unusable dates skipped");
            continue;
        };

        let x_start = axis.date_to_x(start);
        let x_end = axis.date_to_x(end);
        bands.push(GapBand {
            x: x_start,
            width: x_end - x_start,
            severity: gap.severity,
            duration_days: gap.duration_days,
            start,
            end,
        });
    }
    bands
}
