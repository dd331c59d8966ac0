use crate::core::event::{Confidence, Event, TrackKind};
use crate::error::{TimelineError, TimelineResult};
use crate::render::{Color, RectBorder, StrokeStyle};

/// Resolved visual attributes for one event marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualEncoding {
    pub color: Color,
    pub opacity: f64,
    pub border: Option<RectBorder>,
    pub size_px: f64,
}

/// Palette and detection vocabulary for the visual-encoding function.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualConfig {
    pub primary_color: Color,
    pub secondary_color: Color,
    pub micro_color: Color,
    /// Neutral dark used for retrospective reconstructions on the secondary
    /// track, regardless of their stated confidence.
    pub retrospective_color: Color,
    /// Warning hue for unreliable secondary records.
    pub caution_color: Color,
    pub caution_border_color: Color,
    pub interval_span_color: Color,
    pub marker_size_px: f64,
    /// Hedging vocabulary marking semantic uncertainty in free text
    /// (French and German, matching the source corpus).
    pub hedging_terms: Vec<String>,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            primary_color: Color::from_rgb8(0xe7, 0x4c, 0x3c),
            secondary_color: Color::from_rgb8(0x34, 0x98, 0xdb),
            micro_color: Color::from_rgb8(0x2e, 0xcc, 0x71),
            retrospective_color: Color::from_rgb8(0x2c, 0x3e, 0x50),
            caution_color: Color::from_rgb8(0xe6, 0x7e, 0x22),
            caution_border_color: Color::from_rgb8(0xd3, 0x54, 0x00),
            interval_span_color: Color::from_rgb8(0x85, 0xc1, 0xe9),
            marker_size_px: 10.0,
            hedging_terms: [
                "vraisemblable",
                "probable",
                "possible",
                "devrait",
                "pourrait",
                "serait",
                "aurait",
                "peut-être",
                "sans doute",
                "wahrscheinlich",
                "möglich",
                "vermutlich",
                "könnte",
                "sollte",
                "wäre",
                "vielleicht",
                "eventuell",
            ]
            .map(str::to_owned)
            .to_vec(),
        }
    }
}

impl VisualConfig {
    pub fn validate(&self) -> TimelineResult<()> {
        for color in [
            self.primary_color,
            self.secondary_color,
            self.micro_color,
            self.retrospective_color,
            self.caution_color,
            self.caution_border_color,
            self.interval_span_color,
        ] {
            color.validate()?;
        }
        if !self.marker_size_px.is_finite() || self.marker_size_px <= 0.0 {
            return Err(TimelineError::InvalidData(
                "marker size must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn track_color(&self, track: TrackKind) -> Color {
        match track {
            TrackKind::Primary => self.primary_color,
            TrackKind::Secondary => self.secondary_color,
            TrackKind::Micro => self.micro_color,
        }
    }

    /// True when the record's own wording hedges the claim.
    #[must_use]
    pub fn has_semantic_uncertainty(&self, event: &Event) -> bool {
        let quote = event.source_quote.as_deref().unwrap_or("").to_lowercase();
        let description = event.description.to_lowercase();
        self.hedging_terms
            .iter()
            .any(|term| quote.contains(term.as_str()) || description.contains(term.as_str()))
    }
}

/// Pure visual-encoding function over (event, track).
///
/// The secondary track layers epistemic signals: retrospective sources go
/// neutral-dark and translucent, hedged or low-confidence reports go to the
/// warning hue (dashed border when the wording itself hedges), and reliable
/// contemporaneous reports keep the lane blue. Other tracks encode
/// confidence purely through opacity.
#[must_use]
pub fn encode(event: &Event, track: TrackKind, config: &VisualConfig) -> VisualEncoding {
    let base = config.track_color(track);
    let size_px = config.marker_size_px;

    if track == TrackKind::Secondary {
        let retrospective = event.postwar || event.evidence.is_retrospective();
        if retrospective {
            return VisualEncoding {
                color: config.retrospective_color,
                opacity: 0.6,
                border: None,
                size_px,
            };
        }

        let hedged = config.has_semantic_uncertainty(event);
        if hedged || matches!(event.confidence, Confidence::Medium | Confidence::Low) {
            let border = hedged.then(|| RectBorder {
                color: config.caution_border_color,
                stroke_width: 2.0,
                style: StrokeStyle::Dashed {
                    on_px: 3.0,
                    off_px: 3.0,
                },
            });
            return VisualEncoding {
                color: config.caution_color,
                opacity: if event.confidence == Confidence::Low {
                    0.5
                } else {
                    0.7
                },
                border,
                size_px,
            };
        }

        if event.confidence == Confidence::High {
            return VisualEncoding {
                color: config.secondary_color,
                opacity: 0.9,
                border: None,
                size_px,
            };
        }

        return VisualEncoding {
            color: base,
            opacity: 1.0,
            border: None,
            size_px,
        };
    }

    let opacity = match event.confidence {
        Confidence::High => 1.0,
        Confidence::Medium => 0.7,
        Confidence::Low => 0.4,
        Confidence::Unknown => 1.0,
    };

    VisualEncoding {
        color: base,
        opacity,
        border: None,
        size_px,
    }
}
