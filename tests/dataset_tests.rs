use chrono::{NaiveDate, NaiveDateTime};
use timeline_rs::core::{Confidence, DatePrecision, GapSeverity, LinkType, TimelineDataset};

fn on(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[test]
fn legacy_field_names_are_accepted() {
    let raw = r##"{
        "timeline_1_events": [
            {
                "event_id": "E1",
                "date_start": "1941-03-29",
                "event_type": "arrest",
                "confidence": "#confidence/high",
                "date_precision": "exact",
                "evidence_type": "direct_observation",
                "description": "Arrestation",
                "place_name": "Paris",
                "is_postwar_reconstruction": false
            }
        ],
        "timeline_3_chain_links": [
            { "from_id": "M1", "to_id": "M2", "link_type": "REPLIES_TO" }
        ]
    }"##;

    let dataset = TimelineDataset::from_json(raw).expect("dataset");
    let event = &dataset.primary_events[0];
    assert_eq!(event.id.as_deref(), Some("E1"));
    assert_eq!(event.start, on(1941, 3, 29));
    assert_eq!(event.confidence, Confidence::High);
    assert_eq!(event.precision, DatePrecision::Exact);
    assert_eq!(event.place.as_deref(), Some("Paris"));
    assert!(!event.postwar);

    assert_eq!(dataset.chain_links[0].link_type, LinkType::Reply);
}

#[test]
fn missing_arrays_default_to_empty() {
    let dataset = TimelineDataset::from_json("{}").expect("dataset");
    assert!(dataset.primary_events.is_empty());
    assert!(dataset.secondary_events.is_empty());
    assert!(dataset.micro_events.is_empty());
    assert!(dataset.chain_links.is_empty());
    assert!(dataset.information_gaps.is_empty());
}

#[test]
fn unparseable_dates_degrade_to_missing_instead_of_failing() {
    let raw = r#"{
        "timeline_1_events": [
            { "event_id": "E1", "date_start": "unclear, spring 1941", "description": "x" },
            { "event_id": "E2", "date_start": "1941-08-04", "description": "y" }
        ]
    }"#;

    let dataset = TimelineDataset::from_json(raw).expect("dataset");
    assert_eq!(dataset.primary_events[0].start, None);
    assert!(dataset.primary_events[0].is_undated());
    assert_eq!(dataset.primary_events[1].start, on(1941, 8, 4));
}

#[test]
fn datetime_and_date_forms_both_parse() {
    let raw = r#"{
        "timeline_1_events": [
            { "date_start": "1941-08-04T14:30:00", "description": "x" },
            { "date_start": "1941-08-04 14:30:00", "description": "y" },
            { "date_start": "1941-08-04", "description": "z" }
        ]
    }"#;

    let dataset = TimelineDataset::from_json(raw).expect("dataset");
    let expected = NaiveDate::from_ymd_opt(1941, 8, 4)
        .and_then(|d| d.and_hms_opt(14, 30, 0));
    assert_eq!(dataset.primary_events[0].start, expected);
    assert_eq!(dataset.primary_events[1].start, expected);
    assert_eq!(dataset.primary_events[2].start, on(1941, 8, 4));
}

#[test]
fn unknown_enum_values_fall_back_to_their_defaults() {
    let raw = r##"{
        "timeline_2_swiss_view": [
            {
                "date_start": "1941-08-04",
                "confidence": "#confidence/uncertain-new-tag",
                "date_precision": "somewhat",
                "description": "x"
            }
        ],
        "information_gaps": [
            { "start_date": "1941-08-04", "end_date": "1941-09-04", "severity": "MILD" }
        ]
    }"##;

    let dataset = TimelineDataset::from_json(raw).expect("dataset");
    let event = &dataset.secondary_events[0];
    assert_eq!(event.confidence, Confidence::Unknown);
    assert_eq!(event.precision, DatePrecision::Unknown);
    assert_eq!(dataset.information_gaps[0].severity, GapSeverity::Moderate);
}

#[test]
fn events_round_trip_through_serialization() {
    let raw = r#"{
        "timeline_1_events": [
            { "event_id": "E1", "date_start": "1941-03-29", "description": "Arrestation" }
        ]
    }"#;

    let dataset = TimelineDataset::from_json(raw).expect("dataset");
    let serialized = serde_json::to_string(&dataset).expect("serialize");
    let restored = TimelineDataset::from_json(&serialized).expect("reparse");
    assert_eq!(dataset, restored);
}

#[test]
fn statistics_are_carried_through_untouched() {
    let raw = r#"{ "statistics": { "timeline_1_count": 12, "chain_links_count": 4 } }"#;
    let dataset = TimelineDataset::from_json(raw).expect("dataset");
    assert_eq!(dataset.statistics.primary_count, 12);
    assert_eq!(dataset.statistics.chain_links_count, 4);
}
