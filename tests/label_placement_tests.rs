use indexmap::IndexMap;
use timeline_rs::core::Viewport;
use timeline_rs::layout::{
    LabelAnchor, LabelBox, LabelPlacement, LabelPlacementConfig, LabelSide, OverridePoint,
    connector_curve, place_labels,
};
use timeline_rs::render::{Color, CurvePath};

fn config() -> LabelPlacementConfig {
    LabelPlacementConfig {
        visible_width_px: 1000.0,
        label_width_px: 200.0,
        label_height_px: 25.0,
        min_horizontal_gap_px: 25.0,
        row_height_px: 30.0,
        max_rows_above: 2,
        max_rows_below: 1,
        anchor_offset_px: 5.0,
        override_min_distance_px: 20.0,
    }
}

fn anchor(event_index: usize, x: f64) -> LabelAnchor {
    LabelAnchor {
        event_index,
        x,
        y: 100.0,
    }
}

fn no_overrides() -> IndexMap<usize, OverridePoint> {
    IndexMap::new()
}

fn assert_rows_free_of_overlap(placements: &[LabelPlacement], config: &LabelPlacementConfig) {
    for (i, a) in placements.iter().enumerate() {
        for b in placements.iter().skip(i + 1) {
            if a.forced || b.forced || a.user_overridden || b.user_overridden {
                continue;
            }
            if a.side != b.side || a.row != b.row {
                continue;
            }
            let a_end = a.x + config.label_width_px;
            let b_end = b.x + config.label_width_px;
            let separated = a_end + config.min_horizontal_gap_px <= b.x
                || b_end + config.min_horizontal_gap_px <= a.x;
            assert!(
                separated,
                "labels {} and {} overlap in row {} ({:?})",
                a.event_index, b.event_index, a.row, a.side
            );
        }
    }
}

#[test]
fn spread_anchors_alternate_sides_in_row_zero() {
    let anchors = vec![anchor(0, 100.0), anchor(1, 500.0)];
    let placements = place_labels(&anchors, &no_overrides(), &config()).expect("placements");

    assert_eq!(placements[0].side, LabelSide::Above);
    assert_eq!(placements[0].row, 0);
    assert_eq!(placements[0].y, 100.0 - 30.0);

    assert_eq!(placements[1].side, LabelSide::Below);
    assert_eq!(placements[1].row, 0);
    assert_eq!(placements[1].y, 100.0 + 30.0);
}

#[test]
fn crowded_anchors_spill_into_deeper_rows_without_overlap() {
    let anchors = vec![
        anchor(0, 100.0),
        anchor(1, 120.0),
        anchor(2, 140.0),
        anchor(3, 160.0),
    ];
    let cfg = config();
    let placements = place_labels(&anchors, &no_overrides(), &cfg).expect("placements");

    assert_eq!(placements.len(), 4);
    assert_rows_free_of_overlap(&placements, &cfg);
    // Third candidate prefers above again, finds row 0 occupied, and lands
    // in row 1.
    assert_eq!(placements[2].side, LabelSide::Above);
    assert_eq!(placements[2].row, 1);
}

#[test]
fn exhausted_rows_force_into_row_zero_of_the_preferred_side() {
    // Five near-identical anchors exhaust 2 rows above + 1 below.
    let anchors: Vec<LabelAnchor> = (0..5).map(|i| anchor(i, 100.0 + i as f64)).collect();
    let cfg = config();
    let placements = place_labels(&anchors, &no_overrides(), &cfg).expect("placements");

    let forced: Vec<_> = placements.iter().filter(|p| p.forced).collect();
    assert!(!forced.is_empty(), "expected at least one forced placement");
    for placement in &forced {
        assert_eq!(placement.row, 0);
    }
    assert_rows_free_of_overlap(&placements, &cfg);
}

#[test]
fn right_edge_overflow_flips_the_label_left() {
    let anchors = vec![anchor(0, 950.0)];
    let placements = place_labels(&anchors, &no_overrides(), &config()).expect("placements");

    // 955 + 200 would overflow 1000, so the label sits left of the anchor.
    assert_eq!(placements[0].x, 745.0);
}

#[test]
fn left_edge_overflow_clamps_to_zero() {
    let cfg = LabelPlacementConfig {
        visible_width_px: 250.0,
        ..config()
    };
    let anchors = vec![anchor(0, 100.0)];
    let placements = place_labels(&anchors, &no_overrides(), &cfg).expect("placements");

    assert_eq!(placements[0].x, 0.0);
}

#[test]
fn distant_saved_position_overrides_the_computed_one() {
    let mut overrides = IndexMap::new();
    overrides.insert(
        0,
        OverridePoint {
            x: 400.0,
            y: 220.0,
        },
    );

    let placements =
        place_labels(&[anchor(0, 100.0)], &overrides, &config()).expect("placements");
    assert!(placements[0].user_overridden);
    assert_eq!(placements[0].x, 400.0);
    assert_eq!(placements[0].y, 220.0);
}

#[test]
fn saved_position_near_the_anchor_line_is_ignored() {
    let mut overrides = IndexMap::new();
    overrides.insert(
        0,
        OverridePoint {
            x: 400.0,
            y: 110.0,
        },
    );

    let placements =
        place_labels(&[anchor(0, 100.0)], &overrides, &config()).expect("placements");
    assert!(!placements[0].user_overridden);
    assert_eq!(placements[0].x, 105.0);
}

#[test]
fn zero_rows_on_both_sides_is_rejected() {
    let cfg = LabelPlacementConfig {
        max_rows_above: 0,
        max_rows_below: 0,
        ..config()
    };
    assert!(place_labels(&[anchor(0, 100.0)], &no_overrides(), &cfg).is_err());
}

#[test]
fn connector_attaches_to_the_facing_label_edge() {
    let below = LabelBox {
        x: 300.0,
        y: 150.0,
        width: 200.0,
        height: 25.0,
    };
    let curve = connector_curve(100.0, 95.0, below, Color::rgb(1.0, 0.0, 0.0));
    let CurvePath::Quadratic { x0, y0, cx, cy, x1, y1 } = curve.path else {
        panic!("expected a quadratic connector");
    };
    assert_eq!((x0, y0), (100.0, 95.0));
    // Control point stays on the anchor's vertical.
    assert_eq!(cx, 100.0);
    assert_eq!(cy, (95.0 + 150.0) / 2.0);
    // Label below the anchor: the curve ends at the label's top center.
    assert_eq!((x1, y1), (400.0, 150.0));

    let above = LabelBox {
        x: 300.0,
        y: 40.0,
        width: 200.0,
        height: 25.0,
    };
    let curve = connector_curve(100.0, 95.0, above, Color::rgb(1.0, 0.0, 0.0));
    let CurvePath::Quadratic { y1, .. } = curve.path else {
        panic!("expected a quadratic connector");
    };
    // Label above the anchor: the curve ends at the label's bottom edge.
    assert_eq!(y1, 65.0);
}

#[test]
fn viewport_presets_scale_label_width_down_on_narrow_screens() {
    let narrow = LabelPlacementConfig::for_viewport(Viewport::new(600, 800), 2, 1);
    let wide = LabelPlacementConfig::for_viewport(Viewport::new(1400, 900), 2, 1);

    assert_eq!(narrow.label_width_px, 200.0);
    assert_eq!(narrow.min_horizontal_gap_px, 15.0);
    assert_eq!(narrow.visible_width_px, 800.0);

    assert_eq!(wide.label_width_px, 280.0);
    assert_eq!(wide.min_horizontal_gap_px, 25.0);
    assert_eq!(wide.visible_width_px, 1360.0);
}
