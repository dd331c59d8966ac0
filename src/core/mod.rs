pub mod axis;
pub mod dataset;
pub mod event;
pub mod segment;
pub mod types;

pub use axis::SegmentAxis;
pub use dataset::{Statistics, TimelineDataset};
pub use event::{
    ChainLink, Confidence, DatePrecision, Event, EvidenceClass, GapSeverity, InformationGap,
    LinkType, TrackKind,
};
pub use segment::{CompressionWindow, DaySegment, SegmentScaleConfig, build_segments};
pub use types::{Viewport, ViewportClass};
