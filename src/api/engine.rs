use std::collections::{HashMap, HashSet};
use std::time::Instant;

use chrono::NaiveDateTime;

use crate::api::config::{EngineConfig, RenderOptions};
use crate::api::overrides::LabelOverrideStore;
use crate::core::axis::SegmentAxis;
use crate::core::dataset::TimelineDataset;
use crate::core::event::{Event, TrackKind};
use crate::core::segment::build_segments;
use crate::core::types::Viewport;
use crate::error::{TimelineError, TimelineResult};
use crate::graph::chain::{ChainGraph, ChainHighlight, resolve_chain_curves};
use crate::interaction::{DragController, DragOutcome, ResizeDebouncer};
use crate::layout::derived::DerivedFlags;
use crate::layout::gaps::{GapBand, gap_bands};
use crate::layout::grid::{DayMark, MonthMark, day_marks, month_marks};
use crate::layout::labels::{
    LabelAnchor, LabelBox, LabelPlacement, LabelPlacementConfig, connector_curve, place_labels,
};
use crate::layout::stacker::{BandKind, TrackLayout, stack_track};
use crate::render::{
    Color, CurvePrimitive, LinePrimitive, RectPrimitive, RenderFrame, StrokeStyle, TextHAlign,
    TextPrimitive,
};

/// One stacked lane positioned in scene coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedTrack {
    pub top: f64,
    pub layout: TrackLayout,
}

/// A realized label box reported back by the host surface, used to re-derive
/// connector curves after layout settles or a label moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredLabel {
    pub track: TrackKind,
    pub event_index: usize,
    pub label: LabelBox,
}

/// Complete output of one synchronous layout pass.
///
/// Everything here is rebuilt from scratch on every render; only persisted
/// label overrides and the derived-flags table survive across passes.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineScene {
    pub options: RenderOptions,
    pub axis: SegmentAxis,
    pub month_marks: Vec<MonthMark>,
    pub day_marks: Vec<DayMark>,
    pub tracks: Vec<PositionedTrack>,
    pub primary_labels: Vec<LabelPlacement>,
    pub secondary_labels: Vec<LabelPlacement>,
    pub primary_label_config: LabelPlacementConfig,
    pub secondary_label_config: LabelPlacementConfig,
    pub gap_bands: Vec<GapBand>,
    /// Marker centers of rendered micro items, keyed by identifier.
    pub micro_centers: HashMap<String, (f64, f64)>,
    /// Chain curves with their link indices, in link order.
    pub chain_curves: Vec<(usize, CurvePrimitive)>,
    pub frame: RenderFrame,
}

impl TimelineScene {
    #[must_use]
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    #[must_use]
    pub fn track(&self, kind: TrackKind) -> Option<&PositionedTrack> {
        self.tracks.iter().find(|track| track.layout.track == kind)
    }

    fn labels_for(&self, track: TrackKind) -> Option<(&[LabelPlacement], &LabelPlacementConfig)> {
        match track {
            TrackKind::Primary => Some((&self.primary_labels, &self.primary_label_config)),
            TrackKind::Secondary => Some((&self.secondary_labels, &self.secondary_label_config)),
            TrackKind::Micro => None,
        }
    }
}

/// Layout and annotation engine over one loaded dataset.
///
/// All computation is synchronous and single-threaded; every toggle change
/// or settled resize re-runs the full pipeline.
pub struct TimelineEngine<S: LabelOverrideStore> {
    config: EngineConfig,
    dataset: TimelineDataset,
    derived: DerivedFlags,
    chains: ChainGraph,
    overrides: S,
    drag: DragController,
    resize: ResizeDebouncer,
}

impl<S: LabelOverrideStore> TimelineEngine<S> {
    pub fn new(config: EngineConfig, overrides: S) -> TimelineResult<Self> {
        config.validate()?;
        let drag = DragController::new(config.drag);
        Ok(Self {
            config,
            dataset: TimelineDataset::default(),
            derived: DerivedFlags::default(),
            chains: ChainGraph::default(),
            overrides,
            drag,
            resize: ResizeDebouncer::default(),
        })
    }

    /// Installs a dataset, computing derived flags and the chain graph once.
    pub fn load_dataset(&mut self, dataset: TimelineDataset) {
        self.derived = DerivedFlags::compute(&dataset.secondary_events, &self.config.confirmation);
        self.chains = ChainGraph::new(dataset.chain_links.clone());
        self.dataset = dataset;
    }

    /// Parses and installs a dataset from its JSON export.
    ///
    /// A parse failure leaves the previous dataset untouched; the host
    /// renders the error state from the returned reason.
    pub fn load_json(&mut self, raw: &str) -> TimelineResult<()> {
        let dataset = TimelineDataset::from_json(raw)?;
        self.load_dataset(dataset);
        Ok(())
    }

    #[must_use]
    pub fn dataset(&self) -> &TimelineDataset {
        &self.dataset
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> TimelineResult<()> {
        if !viewport.is_valid() {
            return Err(TimelineError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.config.viewport = viewport;
        Ok(())
    }

    /// Records a resize event; the new size applies only after the debounce
    /// window passes without further resizes.
    pub fn request_resize(&mut self, viewport: Viewport, now: Instant) {
        self.resize.request(viewport, now);
    }

    /// Applies a settled resize, returning the viewport that should trigger
    /// a re-render, if any.
    pub fn poll_resize(&mut self, now: Instant) -> TimelineResult<Option<Viewport>> {
        match self.resize.poll(now) {
            Some(viewport) => {
                self.set_viewport(viewport)?;
                Ok(Some(viewport))
            }
            None => Ok(None),
        }
    }

    #[must_use]
    pub fn chain_graph(&self) -> &ChainGraph {
        &self.chains
    }

    /// Connected-component highlight for a hovered link.
    #[must_use]
    pub fn hover_chain(&self, from_id: &str, to_id: &str) -> ChainHighlight {
        self.chains.component(from_id, to_id)
    }

    /// Runs the full layout pipeline for one immutable option snapshot.
    pub fn render(&self, options: &RenderOptions) -> TimelineResult<TimelineScene> {
        let viewport = self.config.viewport;

        let timestamps = self.visible_timestamps(options);
        let segments = build_segments(&timestamps, viewport, &self.config.segment)?;
        let axis = SegmentAxis::new(segments)?;

        let month_marks = month_marks(axis.segments());
        let day_marks = day_marks(axis.segments());

        let tracks = self.stack_visible_tracks(&axis, options)?;

        let (primary_labels, primary_label_config) =
            self.place_track_labels(TrackKind::Primary, &tracks, options)?;
        let (secondary_labels, secondary_label_config) =
            self.place_track_labels(TrackKind::Secondary, &tracks, options)?;

        let gap_bands = if options.highlight_gaps {
            gap_bands(&self.dataset.information_gaps, &axis)
        } else {
            Vec::new()
        };

        let micro_centers = self.micro_centers(&tracks);
        let chain_curves = if options.show_micro && options.show_chains {
            resolve_chain_curves(&self.chains, &micro_centers, None)
        } else {
            Vec::new()
        };

        let mut scene = TimelineScene {
            options: *options,
            axis,
            month_marks,
            day_marks,
            tracks,
            primary_labels,
            secondary_labels,
            primary_label_config,
            secondary_label_config,
            gap_bands,
            micro_centers,
            chain_curves,
            frame: RenderFrame::new(viewport),
        };
        scene.frame = self.build_frame(&scene);
        Ok(scene)
    }

    /// Phase-two geometry: connector curves against realized label boxes.
    ///
    /// Boxes for labels the scene does not know are skipped with a
    /// diagnostic. Callers re-run this whenever a label moves.
    #[must_use]
    pub fn resolve_connectors(
        &self,
        scene: &TimelineScene,
        measured: &[MeasuredLabel],
    ) -> Vec<CurvePrimitive> {
        let mut curves = Vec::with_capacity(measured.len());
        for entry in measured {
            let Some((labels, _)) = scene.labels_for(entry.track) else {
                tracing::debug!(track = ?entry.track, "track carries no labels; box ignored");
                continue;
            };
            let Some(placement) = labels
                .iter()
                .find(|placement| placement.event_index == entry.event_index)
            else {
                tracing::debug!(
                    track = ?entry.track,
                    event_index = entry.event_index,
                    "measured box without matching placement ignored"
                );
                continue;
            };
            let color = self.config.visual.track_color(entry.track);
            curves.push(connector_curve(
                placement.anchor_x,
                placement.anchor_y,
                entry.label,
                color,
            ));
        }
        curves
    }

    /// Begins a drag session for a label. Returns `false` while another
    /// session is active.
    pub fn begin_label_drag(
        &mut self,
        track: TrackKind,
        event_index: usize,
        pointer: (f64, f64),
        label_position: (f64, f64),
    ) -> bool {
        self.drag.begin(track, event_index, pointer, label_position)
    }

    /// Advances the active drag, returning the provisional label position.
    pub fn update_label_drag(&mut self, pointer: (f64, f64)) -> Option<(f64, f64)> {
        self.drag.update(pointer)
    }

    /// Ends the active drag. A committed move is merged into the override
    /// store; a click-equivalent release is reported back for the host to
    /// open the detail view.
    pub fn release_label_drag(&mut self, pointer: (f64, f64)) -> DragOutcome {
        let outcome = self.drag.release(pointer);
        if let DragOutcome::Committed {
            track,
            event_index,
            position,
        } = outcome
        {
            self.overrides.commit(track, event_index, position);
        }
        outcome
    }

    #[must_use]
    pub fn overrides(&self) -> &S {
        &self.overrides
    }

    fn visible_timestamps(&self, options: &RenderOptions) -> Vec<NaiveDateTime> {
        let mut timestamps = Vec::new();
        for (track, visible) in [
            (TrackKind::Primary, options.show_primary),
            (TrackKind::Secondary, options.show_secondary),
            (TrackKind::Micro, options.show_micro),
        ] {
            if !visible {
                continue;
            }
            timestamps.extend(
                self.dataset
                    .events(track)
                    .iter()
                    .filter_map(Event::effective_date),
            );
        }
        timestamps
    }

    fn stack_visible_tracks(
        &self,
        axis: &SegmentAxis,
        options: &RenderOptions,
    ) -> TimelineResult<Vec<PositionedTrack>> {
        let spacing = self.config.spacing;
        let stack = &self.config.stack;

        let expand_height = |events: &[Event]| {
            stack
                .min_track_height_px
                .max(events.len() as f64 * stack.slot_height_px)
        };

        let mut tracks = Vec::new();
        for (track, visible) in [
            (TrackKind::Primary, options.show_primary),
            (TrackKind::Secondary, options.show_secondary),
            (TrackKind::Micro, options.show_micro),
        ] {
            if !visible {
                continue;
            }

            let offset = match track {
                TrackKind::Primary => 0.0,
                TrackKind::Secondary => {
                    if options.expand_sources {
                        expand_height(&self.dataset.primary_events) + spacing.expand_gap_px
                    } else {
                        spacing.secondary_offset_px
                    }
                }
                TrackKind::Micro => {
                    if options.expand_sources {
                        expand_height(&self.dataset.primary_events)
                            + expand_height(&self.dataset.secondary_events)
                            + 2.0 * spacing.expand_gap_px
                    } else {
                        spacing.micro_offset_px
                    }
                }
            };

            let derived = if track == TrackKind::Secondary {
                self.derived.clone()
            } else {
                DerivedFlags::empty(self.dataset.events(track).len())
            };

            let layout = stack_track(
                track,
                self.dataset.events(track),
                axis,
                options,
                &derived,
                &self.config.vocabulary,
                &self.config.visual,
                stack,
            )?;

            tracks.push(PositionedTrack {
                top: spacing.top_px + offset,
                layout,
            });
        }
        Ok(tracks)
    }

    fn place_track_labels(
        &self,
        track: TrackKind,
        tracks: &[PositionedTrack],
        options: &RenderOptions,
    ) -> TimelineResult<(Vec<LabelPlacement>, LabelPlacementConfig)> {
        let (rows_above, rows_below) = match track {
            TrackKind::Primary => self.config.primary_label_rows,
            TrackKind::Secondary => self.config.secondary_label_rows,
            TrackKind::Micro => (1, 1),
        };
        let config =
            LabelPlacementConfig::for_viewport(self.config.viewport, rows_above, rows_below);

        // Expand mode shows raw source records; floating annotations would
        // only repeat them.
        if track == TrackKind::Micro || options.expand_sources {
            return Ok((Vec::new(), config));
        }
        let Some(positioned) = tracks
            .iter()
            .find(|positioned| positioned.layout.track == track)
        else {
            return Ok((Vec::new(), config));
        };

        let marker_half = self.config.visual.marker_size_px / 2.0;
        let events = self.dataset.events(track);

        let primary_ids: HashSet<&str> = if track == TrackKind::Secondary {
            self.dataset
                .primary_events
                .iter()
                .filter_map(|event| event.id.as_deref())
                .collect()
        } else {
            HashSet::new()
        };

        let mut anchors = Vec::new();
        for placed in &positioned.layout.placed {
            let event = &events[placed.index];
            if track == TrackKind::Secondary {
                // Records mirrored from the primary track are annotated
                // there; retrospective entries carry no annotation.
                let mirrored = event
                    .id
                    .as_deref()
                    .is_some_and(|id| primary_ids.contains(id));
                if mirrored || event.postwar || event.evidence.is_retrospective() {
                    continue;
                }
            }
            anchors.push(LabelAnchor {
                event_index: placed.index,
                x: placed.x + marker_half,
                y: positioned.top + placed.y + marker_half,
            });
        }

        let overrides = self.overrides.load(track);
        let placements = place_labels(&anchors, &overrides, &config)?;
        Ok((placements, config))
    }

    fn micro_centers(&self, tracks: &[PositionedTrack]) -> HashMap<String, (f64, f64)> {
        let marker_half = self.config.visual.marker_size_px / 2.0;
        let mut centers = HashMap::new();
        for positioned in tracks {
            if positioned.layout.track != TrackKind::Micro {
                continue;
            }
            for placed in &positioned.layout.placed {
                if let Some(id) = &placed.id {
                    centers.insert(
                        id.clone(),
                        (placed.x + marker_half, positioned.top + placed.y + marker_half),
                    );
                }
            }
        }
        centers
    }

    fn build_frame(&self, scene: &TimelineScene) -> RenderFrame {
        let viewport = self.config.viewport;
        let height = f64::from(viewport.height);
        let mut frame = RenderFrame::new(viewport);

        // Gap bands sit behind everything else.
        for band in &scene.gap_bands {
            frame.rects.push(RectPrimitive::new(
                band.x,
                0.0,
                band.width.max(0.0),
                height,
                Color::from_rgb8(0xd8, 0xbf, 0xd8).with_alpha(0.25),
            ));
        }

        for mark in &scene.month_marks {
            let (width, color) = if mark.year_start {
                (2.0, Color::rgb(0.0, 0.0, 0.0))
            } else {
                (1.0, Color::from_rgb8(0xdd, 0xdd, 0xdd))
            };
            frame
                .lines
                .push(LinePrimitive::new(mark.x, 30.0, mark.x, height, width, color));

            let caption = if mark.year_start {
                TextPrimitive::new(
                    mark.year.to_string(),
                    mark.x + 5.0,
                    5.0,
                    18.0,
                    Color::rgb(0.0, 0.0, 0.0),
                    TextHAlign::Left,
                )
                .bold()
            } else {
                TextPrimitive::new(
                    format!("{:04}-{:02}", mark.year, mark.month),
                    mark.x + 5.0,
                    5.0,
                    12.0,
                    Color::from_rgb8(0x66, 0x66, 0x66),
                    TextHAlign::Left,
                )
            };
            frame.texts.push(caption);
        }

        for mark in &scene.day_marks {
            frame.texts.push(TextPrimitive::new(
                mark.day_of_month.to_string(),
                mark.x_center,
                25.0,
                9.0,
                Color::from_rgb8(0x99, 0x99, 0x99),
                TextHAlign::Center,
            ));
        }

        for positioned in &scene.tracks {
            self.push_track_primitives(&mut frame, positioned, scene);
        }

        for (_, curve) in &scene.chain_curves {
            frame.curves.push(*curve);
        }

        self.push_label_primitives(&mut frame, scene, TrackKind::Primary);
        self.push_label_primitives(&mut frame, scene, TrackKind::Secondary);

        frame
    }

    fn push_track_primitives(
        &self,
        frame: &mut RenderFrame,
        positioned: &PositionedTrack,
        scene: &TimelineScene,
    ) {
        let layout = &positioned.layout;
        let top = positioned.top;
        let track = layout.track;
        let lane_color = self.config.visual.track_color(track);
        let total_width = scene.axis.total_width();

        frame.texts.push(
            TextPrimitive::new(
                track.label(),
                0.0,
                top - 15.0,
                22.0,
                lane_color,
                TextHAlign::Left,
            )
            .bold(),
        );
        frame.lines.push(LinePrimitive::new(
            0.0,
            top + 35.0,
            total_width,
            top + 35.0,
            1.0,
            Color::from_rgb8(0xee, 0xee, 0xee),
        ));

        for whisker in &layout.whiskers {
            frame.rects.push(
                RectPrimitive::new(
                    whisker.x_start,
                    top + whisker.y,
                    whisker.x_end - whisker.x_start,
                    4.0,
                    Color::rgb(0.0, 0.0, 0.0).with_alpha(0.15),
                )
                .with_corner_radius(2.0),
            );
        }

        for band in &layout.bands {
            let (alpha, tick_alpha) = match band.kind {
                BandKind::Announcement => (0.8, 0.9),
                BandKind::Epistemic => (0.6, 0.7),
            };
            let caution = self.config.visual.caution_color;
            frame.rects.push(
                RectPrimitive::new(
                    band.x_start,
                    top + band.y,
                    (band.x_end - band.x_start).max(0.0),
                    10.0,
                    caution.with_alpha(alpha),
                )
                .with_corner_radius(3.0),
            );
            // Tick marking the uncertain starting point of the band.
            frame.rects.push(
                RectPrimitive::new(
                    band.x_start - 2.0,
                    top + band.y - 2.0,
                    4.0,
                    14.0,
                    caution.with_alpha(tick_alpha),
                )
                .with_corner_radius(2.0),
            );
        }

        let span_color = self.config.visual.interval_span_color;
        for span in &layout.intervals {
            frame.rects.push(
                RectPrimitive::new(
                    span.x_start,
                    top + span.y + 2.0,
                    (span.x_end - span.x_start).abs(),
                    8.0,
                    span_color.with_alpha(0.4),
                )
                .with_corner_radius(4.0),
            );
            for edge in [span.x_start, span.x_end] {
                frame.rects.push(RectPrimitive::new(
                    edge,
                    top + span.y,
                    2.0,
                    12.0,
                    span_color.with_alpha(0.7),
                ));
            }
        }

        for placed in &layout.placed {
            let visual = placed.visual;
            let mut marker = RectPrimitive::new(
                placed.x,
                top + placed.y,
                visual.size_px,
                visual.size_px,
                visual.color.with_alpha(visual.opacity),
            )
            .with_corner_radius(visual.size_px / 2.0);
            if let Some(border) = visual.border {
                marker.border = Some(border);
            }
            frame.rects.push(marker);
        }
    }

    fn push_label_primitives(&self, frame: &mut RenderFrame, scene: &TimelineScene, track: TrackKind) {
        let Some((labels, config)) = scene.labels_for(track) else {
            return;
        };
        let lane_color = self.config.visual.track_color(track);
        let events = self.dataset.events(track);

        for placement in labels {
            frame.rects.push(
                RectPrimitive::new(
                    placement.x,
                    placement.y,
                    config.label_width_px,
                    config.label_height_px,
                    Color::rgb(1.0, 1.0, 1.0).with_alpha(0.75),
                )
                .with_corner_radius(2.0)
                .with_border(lane_color.with_alpha(0.15), 1.0, StrokeStyle::Solid),
            );

            if let Some(event) = events.get(placement.event_index) {
                let caption = label_caption(event);
                frame.texts.push(TextPrimitive::new(
                    caption,
                    placement.x + 5.0,
                    placement.y + 3.0,
                    8.0,
                    lane_color.with_alpha(0.85),
                    TextHAlign::Left,
                ));
            }

            let label_box = LabelBox::from_placement(placement, config);
            frame.curves.push(connector_curve(
                placement.anchor_x,
                placement.anchor_y,
                label_box,
                lane_color,
            ));
        }
    }
}

fn label_caption(event: &Event) -> String {
    let kind = if event.kind.is_empty() {
        "Event"
    } else {
        event.kind.as_str()
    };
    match event.place.as_deref().filter(|place| !place.is_empty()) {
        Some(place) => format!("{kind} - {place}"),
        None => kind.to_owned(),
    }
}
