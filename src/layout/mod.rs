pub mod dedup;
pub mod derived;
pub mod gaps;
pub mod grid;
pub mod labels;
pub mod stacker;
pub mod visual;

pub use dedup::{ConceptSet, ConceptVocabulary, dedup_by_id, dedup_by_similarity};
pub use derived::{ConfirmationPolicy, ConfirmationRef, DerivedFlags, EventFlags};
pub use gaps::{GapBand, gap_bands};
pub use grid::{DayMark, MonthMark, day_marks, month_marks};
pub use labels::{
    LabelAnchor, LabelBox, LabelPlacement, LabelPlacementConfig, LabelSide, OverridePoint,
    connector_curve, place_labels,
};
pub use stacker::{
    BandKind, IntervalSpan, PlacedEvent, PrecisionWhisker, StackConfig, TrackLayout,
    UncertaintyBand, stack_track,
};
pub use visual::{VisualConfig, VisualEncoding, encode};
