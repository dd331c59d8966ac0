use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::types::{Viewport, ViewportClass};
use crate::error::{TimelineError, TimelineResult};
use crate::render::{Color, CurvePath, CurvePrimitive, StrokeStyle};

/// Placement tuning for one annotated track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacementConfig {
    /// Width of the window labels must stay inside.
    pub visible_width_px: f64,
    pub label_width_px: f64,
    pub label_height_px: f64,
    pub min_horizontal_gap_px: f64,
    pub row_height_px: f64,
    pub max_rows_above: usize,
    pub max_rows_below: usize,
    /// Offset of a label's left edge from its anchor.
    pub anchor_offset_px: f64,
    /// A persisted override closer to the anchor line than this is treated
    /// as stale layout residue, not a genuine user decision.
    pub override_min_distance_px: f64,
}

impl LabelPlacementConfig {
    /// Viewport-adaptive defaults for an annotated track.
    ///
    /// Narrow screens get narrower labels and tighter gaps so a usable
    /// number of annotations still fits.
    #[must_use]
    pub fn for_viewport(viewport: Viewport, max_rows_above: usize, max_rows_below: usize) -> Self {
        let class = viewport.class();
        let label_width_px = match class {
            ViewportClass::Narrow => 200.0,
            ViewportClass::Medium => 240.0,
            ViewportClass::Wide => 280.0,
        };
        let min_horizontal_gap_px = match class {
            ViewportClass::Narrow => 15.0,
            _ => 25.0,
        };

        Self {
            visible_width_px: (f64::from(viewport.width) - 40.0).max(800.0),
            label_width_px,
            label_height_px: 25.0,
            min_horizontal_gap_px,
            row_height_px: 30.0,
            max_rows_above,
            max_rows_below,
            anchor_offset_px: 5.0,
            override_min_distance_px: 20.0,
        }
    }

    pub fn validate(&self) -> TimelineResult<()> {
        for (value, name) in [
            (self.visible_width_px, "visible_width_px"),
            (self.label_width_px, "label_width_px"),
            (self.label_height_px, "label_height_px"),
            (self.min_horizontal_gap_px, "min_horizontal_gap_px"),
            (self.row_height_px, "row_height_px"),
            (self.anchor_offset_px, "anchor_offset_px"),
            (self.override_min_distance_px, "override_min_distance_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TimelineError::InvalidData(format!(
                    "label config `{name}` must be finite and > 0"
                )));
            }
        }
        if self.max_rows_above == 0 && self.max_rows_below == 0 {
            return Err(TimelineError::InvalidData(
                "label placement needs at least one row on one side".to_owned(),
            ));
        }
        if self.label_width_px > self.visible_width_px {
            return Err(TimelineError::InvalidData(
                "label width must not exceed the visible width".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Placement request: one event anchor in absolute scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelAnchor {
    pub event_index: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelSide {
    Above,
    Below,
}

/// A user-dragged label position persisted across renders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverridePoint {
    pub x: f64,
    pub y: f64,
}

/// Resolved floating-label geometry for one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub event_index: usize,
    pub anchor_x: f64,
    pub anchor_y: f64,
    /// Top-left corner of the label box.
    pub x: f64,
    pub y: f64,
    pub row: usize,
    pub side: LabelSide,
    pub user_overridden: bool,
    /// Row capacity was exhausted on both sides; the label was forced into
    /// row 0 of its preferred side and may overlap. Accepted degradation.
    pub forced: bool,
}

/// Places floating labels around their anchors without horizontal overlap.
///
/// Candidates alternate their preferred side to balance density, scan the
/// preferred side's rows for the first collision-free slot, fall back to
/// the opposite side, and force-place into row 0 as a last resort.
/// Persisted overrides far enough from the anchor line replace the
/// computed position.
pub fn place_labels(
    anchors: &[LabelAnchor],
    overrides: &IndexMap<usize, OverridePoint>,
    config: &LabelPlacementConfig,
) -> TimelineResult<Vec<LabelPlacement>> {
    config.validate()?;

    let mut ordered: Vec<LabelAnchor> = anchors.to_vec();
    ordered.sort_by_key(|anchor| OrderedFloat(anchor.x));

    let mut rows_above: Vec<Vec<(f64, f64)>> = vec![Vec::new(); config.max_rows_above];
    let mut rows_below: Vec<Vec<(f64, f64)>> = vec![Vec::new(); config.max_rows_below];
    let mut placements = Vec::with_capacity(ordered.len());

    for (order, anchor) in ordered.iter().enumerate() {
        let (start_x, end_x) = horizontal_slot(anchor.x, config);

        let prefer_above = order % 2 == 0;
        let (resolved_side, row, forced) = resolve_row(
            start_x,
            end_x,
            prefer_above,
            &mut rows_above,
            &mut rows_below,
            config.min_horizontal_gap_px,
        );

        let offset = (row as f64 + 1.0) * config.row_height_px;
        let y = match resolved_side {
            LabelSide::Above => anchor.y - offset,
            LabelSide::Below => anchor.y + offset,
        };

        let mut placement = LabelPlacement {
            event_index: anchor.event_index,
            anchor_x: anchor.x,
            anchor_y: anchor.y,
            x: start_x,
            y,
            row,
            side: resolved_side,
            user_overridden: false,
            forced,
        };

        if let Some(saved) = overrides.get(&anchor.event_index) {
            if (saved.y - anchor.y).abs() > config.override_min_distance_px {
                placement.x = saved.x;
                placement.y = saved.y;
                placement.user_overridden = true;
            }
        }

        placements.push(placement);
    }

    Ok(placements)
}

/// Places the label to the right of its anchor, flipping left when it would
/// leave the visible window, clamped to stay inside.
fn horizontal_slot(anchor_x: f64, config: &LabelPlacementConfig) -> (f64, f64) {
    let mut start = anchor_x + config.anchor_offset_px;
    let mut end = start + config.label_width_px;

    if end > config.visible_width_px {
        end = anchor_x - config.anchor_offset_px;
        start = end - config.label_width_px;
    }
    if start < 0.0 {
        start = 0.0;
        end = config.label_width_px;
    }

    (start, end)
}

fn resolve_row(
    start_x: f64,
    end_x: f64,
    prefer_above: bool,
    rows_above: &mut [Vec<(f64, f64)>],
    rows_below: &mut [Vec<(f64, f64)>],
    min_gap: f64,
) -> (LabelSide, usize, bool) {
    let (first_side, first_rows, second_side, second_rows) = if prefer_above {
        (LabelSide::Above, rows_above, LabelSide::Below, rows_below)
    } else {
        (LabelSide::Below, rows_below, LabelSide::Above, rows_above)
    };

    if let Some(row) = first_free_row(first_rows, start_x, end_x, min_gap) {
        first_rows[row].push((start_x, end_x));
        return (first_side, row, false);
    }
    if let Some(row) = first_free_row(second_rows, start_x, end_x, min_gap) {
        second_rows[row].push((start_x, end_x));
        return (second_side, row, false);
    }

    // Both sides exhausted: force into row 0 of the preferred side.
    if let Some(row0) = first_rows.first_mut() {
        row0.push((start_x, end_x));
        return (first_side, 0, true);
    }
    // Preferred side has no rows at all; the config validator guarantees
    // the other side has at least one.
    second_rows[0].push((start_x, end_x));
    (second_side, 0, true)
}

fn first_free_row(
    rows: &[Vec<(f64, f64)>],
    start_x: f64,
    end_x: f64,
    min_gap: f64,
) -> Option<usize> {
    rows.iter().position(|row| {
        row.iter()
            .all(|&(min_x, max_x)| start_x >= max_x + min_gap || end_x <= min_x - min_gap)
    })
}

/// Realized on-screen bounding box of a label, reported by the host surface
/// after layout settles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LabelBox {
    #[must_use]
    pub fn from_placement(placement: &LabelPlacement, config: &LabelPlacementConfig) -> Self {
        Self {
            x: placement.x,
            y: placement.y,
            width: config.label_width_px,
            height: config.label_height_px,
        }
    }
}

/// Connector curve from an anchor to the current label box.
///
/// Recomputed from the realized box on every move; the curve attaches to
/// whichever label edge faces the anchor.
#[must_use]
pub fn connector_curve(
    anchor_x: f64,
    anchor_y: f64,
    label: LabelBox,
    color: Color,
) -> CurvePrimitive {
    let end_x = label.x + label.width / 2.0;
    let label_is_below = label.y > anchor_y;
    let end_y = if label_is_below {
        label.y
    } else {
        label.y + label.height
    };
    let control_y = (anchor_y + end_y) / 2.0;

    CurvePrimitive::new(
        CurvePath::Quadratic {
            x0: anchor_x,
            y0: anchor_y,
            cx: anchor_x,
            cy: control_y,
            x1: end_x,
            y1: end_y,
        },
        1.0,
        color.with_alpha(0.25),
        StrokeStyle::Dashed {
            on_px: 2.0,
            off_px: 2.0,
        },
    )
}
