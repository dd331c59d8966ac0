use chrono::{NaiveDate, NaiveDateTime};
use timeline_rs::api::RenderOptions;
use timeline_rs::core::{
    Confidence, DatePrecision, Event, EvidenceClass, SegmentAxis, SegmentScaleConfig, TrackKind,
    Viewport, build_segments,
};
use timeline_rs::layout::{
    ConceptVocabulary, ConfirmationPolicy, DerivedFlags, StackConfig, TrackLayout, VisualConfig,
    stack_track,
};

fn on(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn event(date: Option<NaiveDateTime>, description: &str) -> Event {
    Event {
        start: date,
        description: description.to_owned(),
        confidence: Confidence::High,
        precision: DatePrecision::Exact,
        ..Event::default()
    }
}

fn axis_for(events: &[Event]) -> SegmentAxis {
    let timestamps: Vec<NaiveDateTime> = events.iter().filter_map(Event::effective_date).collect();
    let segments = build_segments(
        &timestamps,
        Viewport::new(1300, 800),
        &SegmentScaleConfig::default(),
    )
    .expect("segments");
    SegmentAxis::new(segments).expect("axis")
}

fn stack(track: TrackKind, events: &[Event], options: &RenderOptions) -> TrackLayout {
    let axis = axis_for(events);
    let derived = if track == TrackKind::Secondary {
        DerivedFlags::compute(events, &ConfirmationPolicy::default())
    } else {
        DerivedFlags::empty(events.len())
    };
    stack_track(
        track,
        events,
        &axis,
        options,
        &derived,
        &ConceptVocabulary::default(),
        &VisualConfig::default(),
        &StackConfig::default(),
    )
    .expect("layout")
}

#[test]
fn co_dated_events_stack_into_consecutive_slots() {
    let events = vec![
        event(on(1943, 2, 1), "premier message"),
        event(on(1943, 2, 1), "deuxième message"),
        event(on(1943, 2, 1), "troisième message"),
        event(on(1943, 3, 1), "autre jour"),
    ];

    let layout = stack(TrackKind::Micro, &events, &RenderOptions::default());
    assert_eq!(layout.placed.len(), 4);
    assert_eq!(layout.max_stack, 3);

    let config = StackConfig::default();
    let same_x: Vec<_> = layout
        .placed
        .iter()
        .filter(|p| p.index < 3)
        .collect();
    for (slot, placed) in same_x.iter().enumerate() {
        assert_eq!(placed.slot, slot);
        let expected = config.marker_row_offset_px + slot as f64 * config.slot_height_px;
        assert_eq!(placed.y, expected);
    }

    assert_eq!(
        layout.height,
        (3.0 * config.slot_height_px + config.bottom_margin_px).max(config.min_track_height_px)
    );
}

#[test]
fn sparse_track_keeps_the_minimum_height() {
    let events = vec![event(on(1943, 2, 1), "seul message")];
    let layout = stack(TrackKind::Micro, &events, &RenderOptions::default());
    assert_eq!(layout.height, StackConfig::default().min_track_height_px);
}

#[test]
fn undated_events_are_excluded_from_geometry() {
    let events = vec![
        event(on(1943, 2, 1), "daté"),
        event(None, "sans date"),
    ];
    let layout = stack(TrackKind::Micro, &events, &RenderOptions::default());
    assert_eq!(layout.placed.len(), 1);
    assert_eq!(layout.placed[0].index, 0);
}

#[test]
fn retrospective_entries_stack_above_contemporaneous_ones() {
    let mut postwar = event(on(1943, 2, 1), "synthèse ultérieure");
    postwar.evidence = EvidenceClass::new("postwar_summary");
    let contemporary = event(on(1943, 2, 1), "rapport consulaire");

    let options = RenderOptions {
        show_postwar: true,
        ..RenderOptions::default()
    };
    // Postwar entry arrives first but must end up in the upper slot.
    let layout = stack(TrackKind::Secondary, &[postwar, contemporary], &options);

    assert_eq!(layout.placed.len(), 2);
    let contemporary_placed = layout.placed.iter().find(|p| p.index == 1).expect("placed");
    let postwar_placed = layout.placed.iter().find(|p| p.index == 0).expect("placed");
    assert_eq!(contemporary_placed.slot, 0);
    assert_eq!(postwar_placed.slot, 1);
}

#[test]
fn retrospective_entries_are_hidden_without_the_toggle() {
    let mut postwar = event(on(1943, 2, 1), "synthèse ultérieure");
    postwar.evidence = EvidenceClass::new("postwar_summary");
    let contemporary = event(on(1943, 2, 2), "rapport consulaire");

    let layout = stack(
        TrackKind::Secondary,
        &[postwar, contemporary],
        &RenderOptions::default(),
    );
    assert_eq!(layout.placed.len(), 1);
    assert_eq!(layout.placed[0].index, 1);
}

#[test]
fn secondary_intervals_render_as_spans_behind_the_toggle() {
    let interval = Event {
        start: on(1942, 1, 1),
        end: on(1942, 2, 1),
        precision: DatePrecision::Interval,
        ..event(on(1942, 1, 1), "période de détention")
    };
    let point = event(on(1942, 3, 1), "rapport");
    let events = vec![interval, point];

    let with_uncertainty = RenderOptions {
        show_uncertainty: true,
        ..RenderOptions::default()
    };
    let layout = stack(TrackKind::Secondary, &events, &with_uncertainty);
    assert_eq!(layout.intervals.len(), 1);
    assert!(layout.intervals[0].x_end > layout.intervals[0].x_start);
    // The interval renders as a span, not a point marker.
    assert!(layout.placed.iter().all(|p| p.index != 0));

    let without_uncertainty = RenderOptions {
        show_uncertainty: false,
        ..RenderOptions::default()
    };
    let layout = stack(TrackKind::Secondary, &events, &without_uncertainty);
    assert!(layout.intervals.is_empty());
}

#[test]
fn primary_track_always_suppresses_intervals() {
    let interval = Event {
        start: on(1942, 1, 1),
        end: on(1942, 2, 1),
        precision: DatePrecision::Interval,
        ..event(on(1942, 1, 1), "période")
    };
    let point = event(on(1942, 3, 1), "événement attesté");

    let options = RenderOptions {
        show_uncertainty: true,
        ..RenderOptions::default()
    };
    let layout = stack(TrackKind::Primary, &[interval, point], &options);
    assert!(layout.intervals.is_empty());
    assert_eq!(layout.placed.len(), 1);
    assert_eq!(layout.placed[0].index, 1);
}

#[test]
fn primary_dedup_collapses_repeated_identifiers() {
    let mut first = event(on(1941, 3, 29), "arrestation");
    first.id = Some("E1".to_owned());
    let mut duplicate = event(on(1941, 3, 29), "arrestation (copie)");
    duplicate.id = Some("E1".to_owned());

    let layout = stack(
        TrackKind::Primary,
        &[first, duplicate],
        &RenderOptions::default(),
    );
    assert_eq!(layout.placed.len(), 1);
    assert_eq!(layout.placed[0].index, 0);
}

#[test]
fn expand_mode_shows_every_source_record() {
    let mut first = event(on(1941, 3, 29), "arrestation");
    first.id = Some("E1".to_owned());
    let mut duplicate = event(on(1941, 3, 29), "arrestation (copie)");
    duplicate.id = Some("E1".to_owned());

    let options = RenderOptions {
        expand_sources: true,
        ..RenderOptions::default()
    };
    let layout = stack(TrackKind::Primary, &[first, duplicate], &options);
    assert_eq!(layout.placed.len(), 2);
}

#[test]
fn imprecise_primary_events_get_a_precision_whisker() {
    let circa = Event {
        precision: DatePrecision::Circa,
        ..event(on(1941, 6, 1), "vers juin")
    };
    let exact = event(on(1941, 8, 1), "attesté");

    let layout = stack(
        TrackKind::Primary,
        &[circa, exact],
        &RenderOptions::default(),
    );

    assert_eq!(layout.whiskers.len(), 1);
    let whisker = layout.whiskers[0];
    assert_eq!(whisker.index, 0);
    assert!(whisker.x_end > whisker.x_start);
}

#[test]
fn announced_confirmations_carry_a_lead_band() {
    // The announcement merges into its same-date confirmation during
    // dedup; the surviving high-confidence record carries the lead band.
    let announcement = Event {
        confidence: Confidence::Medium,
        source_quote: Some("soll verbracht werden".to_owned()),
        ..event(on(1942, 4, 21), "annonce du transfert vers l'Allemagne")
    };
    let confirmation = Event {
        confidence: Confidence::High,
        ..event(on(1942, 4, 21), "transfert vers l'Allemagne exécuté")
    };
    let filler = event(on(1942, 5, 21), "rapport ultérieur");

    let layout = stack(
        TrackKind::Secondary,
        &[announcement, confirmation, filler],
        &RenderOptions::default(),
    );

    let band = layout
        .bands
        .iter()
        .find(|band| band.index == 1)
        .expect("announcement band");
    assert!(band.x_end > band.x_start);
}

#[test]
fn synthesis_records_never_reach_the_stacked_view() {
    let synthesis = Event {
        start: on(1942, 1, 1),
        end: on(1943, 6, 1),
        precision: DatePrecision::Interval,
        ..event(on(1942, 1, 1), "synthèse couvrant la détention")
    };
    let point = event(on(1942, 3, 1), "rapport");

    let options = RenderOptions {
        show_uncertainty: true,
        ..RenderOptions::default()
    };
    let layout = stack(TrackKind::Secondary, &[synthesis, point], &options);
    assert!(layout.intervals.is_empty());
    assert_eq!(layout.placed.len(), 1);
    assert_eq!(layout.placed[0].index, 1);
}
