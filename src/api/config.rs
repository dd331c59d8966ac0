use serde::{Deserialize, Serialize};

use crate::core::segment::SegmentScaleConfig;
use crate::core::types::Viewport;
use crate::error::{TimelineError, TimelineResult};
use crate::interaction::DragConfig;
use crate::layout::dedup::ConceptVocabulary;
use crate::layout::derived::ConfirmationPolicy;
use crate::layout::stacker::StackConfig;
use crate::layout::visual::VisualConfig;

/// One immutable snapshot of every toggle the host control surface owns.
///
/// Passed explicitly into every component; layout code never reads ambient
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub show_primary: bool,
    pub show_secondary: bool,
    pub show_micro: bool,
    /// Show every source record undeduplicated on the annotated tracks.
    pub expand_sources: bool,
    pub show_chains: bool,
    pub show_postwar: bool,
    pub highlight_gaps: bool,
    pub show_uncertainty: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_primary: true,
            show_secondary: true,
            show_micro: true,
            expand_sources: false,
            show_chains: true,
            show_postwar: false,
            highlight_gaps: false,
            show_uncertainty: true,
        }
    }
}

/// Vertical arrangement of the three lanes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSpacingConfig {
    /// Top of the first lane, leaving room for the axis header.
    pub top_px: f64,
    pub secondary_offset_px: f64,
    pub micro_offset_px: f64,
    /// Gap between lanes when expand mode sizes them by record count.
    pub expand_gap_px: f64,
}

impl Default for TrackSpacingConfig {
    fn default() -> Self {
        Self {
            top_px: 60.0,
            secondary_offset_px: 100.0,
            micro_offset_px: 220.0,
            expand_gap_px: 30.0,
        }
    }
}

impl TrackSpacingConfig {
    fn validate(&self) -> TimelineResult<()> {
        for (value, name) in [
            (self.top_px, "top_px"),
            (self.secondary_offset_px, "secondary_offset_px"),
            (self.micro_offset_px, "micro_offset_px"),
            (self.expand_gap_px, "expand_gap_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TimelineError::InvalidData(format!(
                    "track spacing `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Engine bootstrap configuration.
pub struct EngineConfig {
    pub viewport: Viewport,
    pub segment: SegmentScaleConfig,
    pub stack: StackConfig,
    pub spacing: TrackSpacingConfig,
    pub visual: VisualConfig,
    pub drag: DragConfig,
    /// Rows (above, below) for primary-track labels.
    pub primary_label_rows: (usize, usize),
    /// Rows (above, below) for secondary-track labels.
    pub secondary_label_rows: (usize, usize),
    pub vocabulary: ConceptVocabulary,
    pub confirmation: ConfirmationPolicy,
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("viewport", &self.viewport)
            .field("segment", &self.segment)
            .field("stack", &self.stack)
            .field("spacing", &self.spacing)
            .finish_non_exhaustive()
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            segment: SegmentScaleConfig::default(),
            stack: StackConfig::default(),
            spacing: TrackSpacingConfig::default(),
            visual: VisualConfig::default(),
            drag: DragConfig::default(),
            primary_label_rows: (2, 1),
            secondary_label_rows: (2, 2),
            vocabulary: ConceptVocabulary::default(),
            confirmation: ConfirmationPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_segment_config(mut self, segment: SegmentScaleConfig) -> Self {
        self.segment = segment;
        self
    }

    #[must_use]
    pub fn with_confirmation_policy(mut self, policy: ConfirmationPolicy) -> Self {
        self.confirmation = policy;
        self
    }

    pub fn validate(&self) -> TimelineResult<()> {
        if !self.viewport.is_valid() {
            return Err(TimelineError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        self.segment.validate()?;
        self.stack.validate()?;
        self.spacing.validate()?;
        self.visual.validate()?;
        self.vocabulary.validate()?;
        Ok(())
    }
}
