use chrono::{NaiveDate, NaiveDateTime};
use timeline_rs::core::{Confidence, DatePrecision, Event};
use timeline_rs::layout::{ConceptVocabulary, dedup_by_id, dedup_by_similarity};

fn on(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn report(date: Option<NaiveDateTime>, description: &str) -> Event {
    Event {
        start: date,
        description: description.to_owned(),
        confidence: Confidence::Medium,
        precision: DatePrecision::Exact,
        ..Event::default()
    }
}

#[test]
fn id_dedup_keeps_first_occurrence_and_anonymous_entries() {
    let mut events = vec![
        report(on(1941, 3, 29), "a"),
        report(on(1941, 3, 29), "b"),
        report(on(1941, 3, 30), "c"),
        report(on(1941, 3, 31), "d"),
    ];
    events[0].id = Some("E1".to_owned());
    events[1].id = Some("E1".to_owned());
    events[2].id = Some("E2".to_owned());

    assert_eq!(dedup_by_id(&events), vec![0, 2, 3]);
}

#[test]
fn death_sentence_reports_always_merge() {
    let events = vec![
        report(on(1942, 6, 1), "Condamné à mort par le tribunal militaire"),
        report(on(1942, 6, 1), "Zum Tode verurteilt"),
    ];

    let survivors = dedup_by_similarity(&events, &ConceptVocabulary::default());
    assert_eq!(survivors.len(), 1);
}

#[test]
fn reinforced_transfer_reports_merge() {
    // Shared transfer concept alone sits at 50 % overlap; the matching
    // destination pushes the pair over the threshold.
    let events = vec![
        report(on(1942, 4, 21), "Transfert du détenu vers l'Allemagne"),
        report(on(1942, 4, 21), "Verbracht nach Deutschland"),
    ];

    let survivors = dedup_by_similarity(&events, &ConceptVocabulary::default());
    assert_eq!(survivors.len(), 1);
}

#[test]
fn unrelated_same_date_reports_stay_separate() {
    let events = vec![
        report(on(1941, 8, 4), "Arrestation à Paris"),
        report(on(1941, 8, 4), "Jugement devant le tribunal"),
    ];

    let survivors = dedup_by_similarity(&events, &ConceptVocabulary::default());
    assert_eq!(survivors.len(), 2);
}

#[test]
fn similar_reports_on_different_dates_stay_separate() {
    let events = vec![
        report(on(1942, 6, 1), "Condamné à mort"),
        report(on(1942, 6, 9), "Zum Tode verurteilt"),
    ];

    let survivors = dedup_by_similarity(&events, &ConceptVocabulary::default());
    assert_eq!(survivors.len(), 2);
}

#[test]
fn higher_confidence_report_survives_the_merge() {
    let mut events = vec![
        report(on(1942, 6, 1), "Condamné à mort (rumeur)"),
        report(on(1942, 6, 1), "Condamnation à mort confirmée, mort certaine"),
    ];
    events[0].confidence = Confidence::Medium;
    events[1].confidence = Confidence::High;

    let survivors = dedup_by_similarity(&events, &ConceptVocabulary::default());
    assert_eq!(survivors, vec![1]);
}

#[test]
fn precision_breaks_confidence_ties() {
    let mut events = vec![
        report(on(1942, 6, 1), "Condamné à mort"),
        report(on(1942, 6, 1), "Condamné à mort, date exacte"),
    ];
    events[0].precision = DatePrecision::Interval;
    events[1].precision = DatePrecision::Exact;

    let survivors = dedup_by_similarity(&events, &ConceptVocabulary::default());
    assert_eq!(survivors, vec![1]);
}

#[test]
fn undated_reports_group_together() {
    let events = vec![
        report(None, "Condamné à mort"),
        report(None, "Zum Tode verurteilt"),
        report(on(1942, 6, 1), "Condamné à mort"),
    ];

    let survivors = dedup_by_similarity(&events, &ConceptVocabulary::default());
    assert_eq!(survivors.len(), 2);
}
