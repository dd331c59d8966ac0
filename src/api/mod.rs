pub mod config;
pub mod engine;
pub mod overrides;

pub use config::{EngineConfig, RenderOptions, TrackSpacingConfig};
pub use engine::{MeasuredLabel, PositionedTrack, TimelineEngine, TimelineScene};
pub use overrides::{LabelOverrideStore, MemoryOverrideStore};
