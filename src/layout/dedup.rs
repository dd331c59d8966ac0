use chrono::NaiveDate;
use indexmap::IndexMap;
use regex::Regex;

use crate::core::event::Event;
use crate::error::{TimelineError, TimelineResult};

/// Similarity above which two same-date records describe the same event.
const SIMILARITY_THRESHOLD: f64 = 0.6;

/// One concept recognized in event descriptions.
///
/// Patterns are bilingual (source corpus mixes French and German reports).
#[derive(Debug, Clone)]
pub struct ConceptPattern {
    pub name: &'static str,
    pub regex: Regex,
    /// Two records sharing a hard-merge concept always collapse, regardless
    /// of overall similarity.
    pub hard_merge: bool,
}

impl ConceptPattern {
    fn new(name: &'static str, pattern: &str, hard_merge: bool) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("static pattern"),
            hard_merge,
        }
    }
}

/// Fixed vocabulary of domain concepts used for similarity grouping.
#[derive(Debug, Clone)]
pub struct ConceptVocabulary {
    patterns: Vec<ConceptPattern>,
    /// Reinforcement pair: when both records match both expressions, they
    /// gain half a shared concept (same movement toward the same place).
    movement: Regex,
    destination: Regex,
    reinforcement_weight: f64,
}

impl Default for ConceptVocabulary {
    fn default() -> Self {
        let patterns = vec![
            ConceptPattern::new(
                "death_sentence",
                r"condamn.*mort|mort|death sentence|zum tode verurteilt|todesstrafe",
                true,
            ),
            ConceptPattern::new("execution", r"exécut|vollstreckung|execution", false),
            ConceptPattern::new("suspension", r"suspen|aussetz|sursis", false),
            ConceptPattern::new("clemency", r"grâce|gnade|pardon|recours", false),
            ConceptPattern::new("transfer", r"transfert|transfér|verbracht|überstell", false),
            ConceptPattern::new("arrest", r"arrêt|arrest|verhaft", false),
            ConceptPattern::new("espionage", r"espion|spionage", false),
            ConceptPattern::new("trial", r"tribunal|procès|trial|gericht|jugement", false),
            ConceptPattern::new(
                "detention",
                r"détention|prison|gefängnis|haft|incarcér|emprisonn",
                false,
            ),
            ConceptPattern::new("site_cherche_midi", r"cherche-midi", false),
            ConceptPattern::new("site_la_sante", r"la santé|santé", false),
            ConceptPattern::new("city_paris", r"paris", false),
            ConceptPattern::new("indictment", r"inculp|anklage|charge", false),
            ConceptPattern::new("release", r"libér|befreit|freed|released", false),
            ConceptPattern::new("commutation", r"commut|begnad", false),
        ];

        Self {
            patterns,
            movement: Regex::new(r"transfert|transfér|déport|verbracht").expect("static pattern"),
            destination: Regex::new(r"allemagne|deutschland").expect("static pattern"),
            reinforcement_weight: 0.5,
        }
    }
}

impl ConceptVocabulary {
    pub fn validate(&self) -> TimelineResult<()> {
        if self.patterns.len() > 32 {
            return Err(TimelineError::InvalidData(
                "concept vocabulary supports at most 32 concepts".to_owned(),
            ));
        }
        if !self.reinforcement_weight.is_finite() || self.reinforcement_weight < 0.0 {
            return Err(TimelineError::InvalidData(
                "reinforcement weight must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn concept_names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|p| p.name).collect()
    }

    /// Extracts the concept set present in a description.
    #[must_use]
    pub fn extract(&self, description: &str) -> ConceptSet {
        let text = description.to_lowercase();
        let mut set = ConceptSet::default();
        for (bit, pattern) in self.patterns.iter().enumerate() {
            if pattern.regex.is_match(&text) {
                set.insert(bit);
            }
        }
        set
    }

    /// True when two records plausibly describe the same underlying event.
    #[must_use]
    pub fn are_similar(&self, a: &Event, b: &Event) -> bool {
        let set_a = self.extract(&a.description);
        let set_b = self.extract(&b.description);

        for (bit, pattern) in self.patterns.iter().enumerate() {
            if pattern.hard_merge && set_a.contains(bit) && set_b.contains(bit) {
                return true;
            }
        }

        let union = set_a.union_count(set_b);
        if union == 0 {
            return false;
        }

        let mut common = set_a.intersection_count(set_b) as f64;

        let text_a = a.description.to_lowercase();
        let text_b = b.description.to_lowercase();
        let both_movement = self.movement.is_match(&text_a) && self.movement.is_match(&text_b);
        let both_destination =
            self.destination.is_match(&text_a) && self.destination.is_match(&text_b);
        if both_movement && both_destination {
            common += self.reinforcement_weight;
        }

        common / union as f64 > SIMILARITY_THRESHOLD
    }
}

/// Bitset over vocabulary concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConceptSet(u32);

impl ConceptSet {
    pub fn insert(&mut self, bit: usize) {
        self.0 |= 1 << bit;
    }

    #[must_use]
    pub fn contains(self, bit: usize) -> bool {
        self.0 & (1 << bit) != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn intersection_count(self, other: Self) -> u32 {
        (self.0 & other.0).count_ones()
    }

    #[must_use]
    pub fn union_count(self, other: Self) -> u32 {
        (self.0 | other.0).count_ones()
    }
}

/// Primary-track selection: at most one entry per identifier, first
/// occurrence wins; entries without an identifier always render.
#[must_use]
pub fn dedup_by_id(events: &[Event]) -> Vec<usize> {
    let mut seen = std::collections::HashSet::new();
    let mut kept = Vec::with_capacity(events.len());
    for (index, event) in events.iter().enumerate() {
        match &event.id {
            Some(id) => {
                if seen.insert(id.clone()) {
                    kept.push(index);
                }
            }
            None => kept.push(index),
        }
    }
    kept
}

/// Secondary-track selection: same-date records merge into similarity
/// classes; within each class the single highest-ranked record survives.
///
/// Rank is confidence first, then date precision. Group order follows first
/// appearance, keeping the output deterministic for identical inputs.
#[must_use]
pub fn dedup_by_similarity(events: &[Event], vocabulary: &ConceptVocabulary) -> Vec<usize> {
    let mut by_date: IndexMap<Option<NaiveDate>, Vec<usize>> = IndexMap::new();
    for (index, event) in events.iter().enumerate() {
        by_date
            .entry(event.start.map(|ts| ts.date()))
            .or_default()
            .push(index);
    }

    let mut survivors = Vec::new();
    for group in by_date.values() {
        let mut assigned = vec![false; group.len()];
        for (i, &candidate) in group.iter().enumerate() {
            if assigned[i] {
                continue;
            }
            assigned[i] = true;
            let mut class = vec![candidate];
            for (j, &other) in group.iter().enumerate().skip(i + 1) {
                if !assigned[j] && vocabulary.are_similar(&events[candidate], &events[other]) {
                    assigned[j] = true;
                    class.push(other);
                }
            }
            survivors.push(best_ranked(events, &class));
        }
    }
    survivors
}

fn best_ranked(events: &[Event], class: &[usize]) -> usize {
    let mut best = class[0];
    for &index in &class[1..] {
        let lhs = (
            events[index].confidence.rank(),
            events[index].precision.rank(),
        );
        let rhs = (events[best].confidence.rank(), events[best].precision.rank());
        if lhs > rhs {
            best = index;
        }
    }
    best
}
