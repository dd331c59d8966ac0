use chrono::{NaiveDate, NaiveDateTime};
use timeline_rs::core::{SegmentAxis, SegmentScaleConfig, Viewport, build_segments};

fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(hour, 0, 0)
        .expect("valid time")
}

fn axis_over(timestamps: &[NaiveDateTime]) -> SegmentAxis {
    let viewport = Viewport::new(1300, 800);
    let segments =
        build_segments(timestamps, viewport, &SegmentScaleConfig::default()).expect("segments");
    SegmentAxis::new(segments).expect("axis")
}

#[test]
fn day_start_maps_to_segment_x_start() {
    let axis = axis_over(&[
        at(2020, 1, 1, 0),
        at(2020, 1, 2, 0),
        at(2020, 1, 5, 0),
    ]);

    for segment in axis.segments() {
        let x = axis.date_to_x(segment.day_start());
        assert_eq!(x, segment.x_start);
    }
}

#[test]
fn position_interpolates_within_the_day() {
    let axis = axis_over(&[at(2020, 1, 1, 0), at(2020, 1, 2, 0)]);
    let segment = axis.segments()[0];

    let noon = axis.date_to_x(at(2020, 1, 1, 12));
    assert!((noon - (segment.x_start + segment.width / 2.0)).abs() < 1e-9);
}

#[test]
fn mapping_is_monotone_over_covered_timestamps() {
    let axis = axis_over(&[
        at(1941, 3, 29, 0),
        at(1941, 8, 4, 0),
        at(1942, 4, 17, 0),
        at(1942, 4, 21, 0),
    ]);

    let samples = [
        at(1941, 3, 29, 0),
        at(1941, 3, 29, 6),
        at(1941, 3, 29, 23),
        at(1941, 8, 4, 1),
        at(1941, 8, 4, 18),
        at(1942, 4, 17, 0),
        at(1942, 4, 21, 12),
    ];

    let mut previous = f64::NEG_INFINITY;
    for sample in samples {
        let x = axis.date_to_x(sample);
        assert!(x >= previous, "x regressed at {sample}");
        previous = x;
    }
}

#[test]
fn uncovered_timestamps_clamp_to_the_end_edge() {
    let axis = axis_over(&[at(2020, 1, 1, 0), at(2020, 1, 5, 0)]);

    // A day between segments carries no axis space.
    assert_eq!(axis.date_to_x(at(2020, 1, 3, 0)), axis.total_width());
    // Before and after the covered range behave the same way.
    assert_eq!(axis.date_to_x(at(2019, 12, 1, 0)), axis.total_width());
    assert_eq!(axis.date_to_x(at(2021, 1, 1, 0)), axis.total_width());
}

#[test]
fn total_width_matches_last_segment_edge() {
    let axis = axis_over(&[at(2020, 1, 1, 0), at(2020, 1, 2, 0)]);
    let last = axis.segments().last().expect("segments");
    assert_eq!(axis.total_width(), last.x_start + last.width);
}

#[test]
fn unsorted_segments_are_rejected() {
    let viewport = Viewport::new(1300, 800);
    let mut segments = build_segments(
        &[at(2020, 1, 1, 0), at(2020, 1, 2, 0)],
        viewport,
        &SegmentScaleConfig::default(),
    )
    .expect("segments");
    segments.swap(0, 1);

    assert!(SegmentAxis::new(segments).is_err());
}

#[test]
fn px_per_day_estimate_is_positive() {
    let axis = axis_over(&[at(2020, 1, 1, 0), at(2020, 1, 2, 0)]);
    assert!(axis.px_per_day_estimate() > 0.0);
}
