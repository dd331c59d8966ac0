//! timeline-rs: layout and annotation engine for multi-track evidentiary
//! timelines.
//!
//! The crate computes day-granularity density-scaled time segments, maps
//! timestamps to axis coordinates, stacks co-dated events per track with
//! confidence/precision visual encoding, places collision-free floating
//! labels with user-draggable overrides, highlights communication chains,
//! and overlays declared information gaps. Output is a backend-agnostic
//! `RenderFrame`; hosts bring their own surface (or the optional Cairo
//! backend).

pub mod api;
pub mod core;
pub mod error;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod telemetry;

pub use api::{EngineConfig, RenderOptions, TimelineEngine};
pub use error::{TimelineError, TimelineResult};
