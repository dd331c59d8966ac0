use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::types::{Viewport, ViewportClass};
use crate::error::{TimelineError, TimelineResult};

/// One calendar day on the mapped axis.
///
/// Segments exist only for days carrying at least one event; together they
/// partition the axis contiguously in day order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaySegment {
    pub day: NaiveDate,
    pub width: f64,
    pub x_start: f64,
    pub event_count: usize,
}

impl DaySegment {
    #[must_use]
    pub fn day_start(self) -> NaiveDateTime {
        self.day.and_time(chrono::NaiveTime::MIN)
    }

    #[must_use]
    pub fn day_end(self) -> NaiveDateTime {
        self.day_start() + chrono::Duration::days(1)
    }

    #[must_use]
    pub fn x_end(self) -> f64 {
        self.x_start + self.width
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.day.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.day.month()
    }

    #[must_use]
    pub fn day_of_month(self) -> u32 {
        self.day.day()
    }
}

/// Named width-compression policy for a known editorial date window.
///
/// The engine never infers these; the host opts in per dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub factor: f64,
}

impl CompressionWindow {
    #[must_use]
    pub fn new(from: NaiveDate, to: NaiveDate, factor: f64) -> Self {
        Self { from, to, factor }
    }

    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.from && day <= self.to
    }

    fn validate(&self) -> TimelineResult<()> {
        if self.to < self.from {
            return Err(TimelineError::InvalidData(
                "compression window end must not precede its start".to_owned(),
            ));
        }
        if !self.factor.is_finite() || self.factor <= 0.0 || self.factor > 1.0 {
            return Err(TimelineError::InvalidData(
                "compression factor must be finite and in (0, 1]".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Tuning for day-segment width computation and viewport fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentScaleConfig {
    /// Base width of one day before density scaling.
    pub base_width_px: f64,
    /// Fixed width for sparse days, overriding the density formula.
    pub min_width_px: f64,
    /// Days with at most this many events are clamped to `min_width_px`.
    pub sparse_event_max: usize,
    /// Density multiplier reaches `1 + density_gain` at the busiest day.
    pub density_gain: f64,
    /// Narrow viewports get this multiple of their width as target.
    pub narrow_width_factor: f64,
    pub narrow_min_px: f64,
    pub medium_margin_px: f64,
    pub medium_min_px: f64,
    pub wide_margin_px: f64,
    pub wide_min_px: f64,
    #[serde(default)]
    pub compression: Vec<CompressionWindow>,
}

impl Default for SegmentScaleConfig {
    fn default() -> Self {
        Self {
            base_width_px: 28.0,
            min_width_px: 21.0,
            sparse_event_max: 2,
            density_gain: 3.0,
            narrow_width_factor: 2.5,
            narrow_min_px: 800.0,
            medium_margin_px: 40.0,
            medium_min_px: 1000.0,
            wide_margin_px: 40.0,
            wide_min_px: 1200.0,
            compression: Vec::new(),
        }
    }
}

impl SegmentScaleConfig {
    pub fn validate(&self) -> TimelineResult<()> {
        for (value, name) in [
            (self.base_width_px, "base_width_px"),
            (self.min_width_px, "min_width_px"),
            (self.density_gain, "density_gain"),
            (self.narrow_width_factor, "narrow_width_factor"),
            (self.narrow_min_px, "narrow_min_px"),
            (self.medium_min_px, "medium_min_px"),
            (self.wide_min_px, "wide_min_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TimelineError::InvalidData(format!(
                    "segment config `{name}` must be finite and > 0"
                )));
            }
        }
        for (value, name) in [
            (self.medium_margin_px, "medium_margin_px"),
            (self.wide_margin_px, "wide_margin_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TimelineError::InvalidData(format!(
                    "segment config `{name}` must be finite and >= 0"
                )));
            }
        }
        for window in &self.compression {
            window.validate()?;
        }
        Ok(())
    }

    /// Target total axis width for the given viewport.
    ///
    /// Narrow viewports deliberately overshoot the screen so the axis stays
    /// explorable by horizontal scrolling.
    #[must_use]
    pub fn target_total_width(&self, viewport: Viewport) -> f64 {
        let width = f64::from(viewport.width);
        match viewport.class() {
            ViewportClass::Narrow => (width * self.narrow_width_factor).max(self.narrow_min_px),
            ViewportClass::Medium => (width - self.medium_margin_px).max(self.medium_min_px),
            ViewportClass::Wide => (width - self.wide_margin_px).max(self.wide_min_px),
        }
    }
}

/// Buckets timestamps into day segments with density-proportional widths,
/// then rescales the run to the viewport's target total width.
///
/// Undated input never reaches this function; an empty timestamp set is an
/// error the engine surfaces as its load-failure state.
pub fn build_segments(
    timestamps: &[NaiveDateTime],
    viewport: Viewport,
    config: &SegmentScaleConfig,
) -> TimelineResult<Vec<DaySegment>> {
    config.validate()?;
    if !viewport.is_valid() {
        return Err(TimelineError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for ts in timestamps {
        *per_day.entry(ts.date()).or_insert(0) += 1;
    }

    if per_day.is_empty() {
        return Err(TimelineError::InvalidData(
            "segments cannot be built from an empty day set".to_owned(),
        ));
    }

    let max_count = per_day.values().copied().max().unwrap_or(1).max(1);

    let mut segments = Vec::with_capacity(per_day.len());
    let mut x = 0.0_f64;
    for (day, count) in per_day {
        let mut width = if count <= config.sparse_event_max {
            config.min_width_px
        } else {
            let density = count as f64 / max_count as f64;
            config.base_width_px * (1.0 + config.density_gain * density)
        };

        for window in &config.compression {
            if window.contains(day) {
                width *= window.factor;
            }
        }

        width = width.round();
        segments.push(DaySegment {
            day,
            width,
            x_start: x,
            event_count: count,
        });
        x += width;
    }

    let target = config.target_total_width(viewport);
    let scale = target / x;

    let mut scaled_x = 0.0_f64;
    for segment in &mut segments {
        segment.width = (segment.width * scale).round();
        segment.x_start = scaled_x;
        scaled_x += segment.width;
    }

    Ok(segments)
}
