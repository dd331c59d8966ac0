use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::event::TrackKind;
use crate::error::TimelineResult;
use crate::layout::labels::OverridePoint;

/// Client-scoped persistence for user-dragged label positions.
///
/// One independent map per annotated track, keyed by event index. Reads
/// happen once per render; writes happen on drag commit and must merge into
/// the existing map so other events' saved positions survive.
pub trait LabelOverrideStore {
    fn load(&self, track: TrackKind) -> IndexMap<usize, OverridePoint>;
    fn save(&mut self, track: TrackKind, positions: IndexMap<usize, OverridePoint>);

    /// Read-modify-write commit of a single override.
    fn commit(&mut self, track: TrackKind, event_index: usize, position: OverridePoint) {
        let mut positions = self.load(track);
        positions.insert(event_index, position);
        self.save(track, positions);
    }
}

/// In-memory store, also usable as the serialization model for hosts that
/// persist overrides in a key-value backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MemoryOverrideStore {
    #[serde(default)]
    primary: IndexMap<usize, OverridePoint>,
    #[serde(default)]
    secondary: IndexMap<usize, OverridePoint>,
}

impl MemoryOverrideStore {
    pub fn from_json(raw: &str) -> TimelineResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> TimelineResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl LabelOverrideStore for MemoryOverrideStore {
    fn load(&self, track: TrackKind) -> IndexMap<usize, OverridePoint> {
        match track {
            TrackKind::Primary => self.primary.clone(),
            TrackKind::Secondary => self.secondary.clone(),
            // The micro track carries no floating labels.
            TrackKind::Micro => IndexMap::new(),
        }
    }

    fn save(&mut self, track: TrackKind, positions: IndexMap<usize, OverridePoint>) {
        match track {
            TrackKind::Primary => self.primary = positions,
            TrackKind::Secondary => self.secondary = positions,
            TrackKind::Micro => {}
        }
    }
}
