use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::event::TrackKind;
use crate::core::types::Viewport;
use crate::layout::labels::OverridePoint;

/// Tuning for label drag sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Releases under this pointer displacement count as clicks, not drags.
    pub click_threshold_px: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            click_threshold_px: 5.0,
        }
    }
}

/// In-progress drag of one floating label.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    track: TrackKind,
    event_index: usize,
    start_pointer: (f64, f64),
    start_label: (f64, f64),
    current_label: (f64, f64),
}

/// Terminal outcome of a drag session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// Net displacement exceeded the click threshold; the position should be
    /// persisted as a user override.
    Committed {
        track: TrackKind,
        event_index: usize,
        position: OverridePoint,
    },
    /// The pointer barely moved; treat as activation of the label's detail
    /// view instead of a move.
    Click {
        track: TrackKind,
        event_index: usize,
    },
    /// No session was active; releases without an acquisition are no-ops.
    Ignored,
}

/// Explicit drag-session state machine: Idle → Dragging → (Committed | Click).
///
/// At most one session is active at a time; attempts to begin a second are
/// rejected rather than silently replacing the first.
#[derive(Debug, Default)]
pub struct DragController {
    config: DragConfig,
    session: Option<DragSession>,
}

impl DragController {
    #[must_use]
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Acquires a drag session. Returns `false` if one is already active.
    pub fn begin(
        &mut self,
        track: TrackKind,
        event_index: usize,
        pointer: (f64, f64),
        label_position: (f64, f64),
    ) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(DragSession {
            track,
            event_index,
            start_pointer: pointer,
            start_label: label_position,
            current_label: label_position,
        });
        true
    }

    /// Advances the session and returns the provisional label position so
    /// the host can redraw the connector immediately.
    pub fn update(&mut self, pointer: (f64, f64)) -> Option<(f64, f64)> {
        let session = self.session.as_mut()?;
        let dx = pointer.0 - session.start_pointer.0;
        let dy = pointer.1 - session.start_pointer.1;
        session.current_label = (session.start_label.0 + dx, session.start_label.1 + dy);
        Some(session.current_label)
    }

    /// Ends the session, classifying it by net pointer displacement.
    pub fn release(&mut self, pointer: (f64, f64)) -> DragOutcome {
        let Some(session) = self.session.take() else {
            return DragOutcome::Ignored;
        };

        let dx = pointer.0 - session.start_pointer.0;
        let dy = pointer.1 - session.start_pointer.1;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance < self.config.click_threshold_px {
            DragOutcome::Click {
                track: session.track,
                event_index: session.event_index,
            }
        } else {
            DragOutcome::Committed {
                track: session.track,
                event_index: session.event_index,
                position: OverridePoint {
                    x: session.start_label.0 + dx,
                    y: session.start_label.1 + dy,
                },
            }
        }
    }
}

/// Collapses a resize storm into the last viewport seen in the window.
///
/// Deterministic: callers pass the current instant, so tests drive time
/// explicitly and no timer thread exists.
#[derive(Debug)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<(Viewport, Instant)>,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}

impl ResizeDebouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Records a resize, restarting the quiet-period window.
    pub fn request(&mut self, viewport: Viewport, now: Instant) {
        self.pending = Some((viewport, now + self.delay));
    }

    /// Returns the settled viewport once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Viewport> {
        match self.pending {
            Some((viewport, deadline)) if now >= deadline => {
                self.pending = None;
                Some(viewport)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
