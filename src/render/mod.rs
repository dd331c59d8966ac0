mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, CurvePath, CurvePrimitive, FontWeight, LinePrimitive, RectBorder, RectPrimitive,
    StrokeStyle, TextHAlign, TextPrimitive,
};

use crate::error::TimelineResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from timeline domain and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> TimelineResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
