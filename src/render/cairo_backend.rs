use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{TimelineError, TimelineResult};
use crate::render::{Color, FontWeight, RenderFrame, Renderer, StrokeStyle, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub rects_drawn: usize,
    pub lines_drawn: usize,
    pub curves_drawn: usize,
    pub texts_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a host drawing-area callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> TimelineResult<()>;
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// This renderer supports two modes:
/// - offscreen image-surface rendering through `Renderer::render`
/// - in-place rendering on an external Cairo context through
///   `CairoContextRenderer`
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> TimelineResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(TimelineError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::rgb(1.0, 1.0, 1.0),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) -> TimelineResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> TimelineResult<()> {
        frame.validate()?;
        self.clear_color.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();

        for rect in &frame.rects {
            append_rect_path(context, *rect);
            apply_color(context, rect.fill);
            if let Some(border) = rect.border {
                context
                    .fill_preserve()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
                apply_color(context, border.color);
                apply_dash(context, border.style);
                context.set_line_width(border.stroke_width);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke rectangle border", err))?;
                apply_dash(context, StrokeStyle::Solid);
            } else {
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            }
            stats.rects_drawn += 1;
        }

        for line in &frame.lines {
            apply_color(context, line.color);
            apply_dash(context, line.style);
            context.set_line_width(line.stroke_width);
            context.move_to(line.x1, line.y1);
            context.line_to(line.x2, line.y2);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            stats.lines_drawn += 1;
        }

        for curve in &frame.curves {
            let [x0, y0, c1x, c1y, c2x, c2y, x1, y1] = curve.path.as_cubic();
            apply_color(context, curve.color);
            apply_dash(context, curve.style);
            context.set_line_width(curve.stroke_width);
            context.move_to(x0, y0);
            context.curve_to(c1x, c1y, c2x, c2y, x1, y1);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke curve", err))?;
            stats.curves_drawn += 1;
        }

        apply_dash(context, StrokeStyle::Solid);

        for text in &frame.texts {
            let layout = pangocairo::functions::create_layout(context);
            let weight = match text.weight {
                FontWeight::Normal => "",
                FontWeight::Bold => "Bold ",
            };
            let font_description =
                FontDescription::from_string(&format!("Sans {weight}{}", text.font_size_px));
            layout.set_font_description(Some(&font_description));
            layout.set_text(&text.text);

            let (text_width, _text_height) = layout.pixel_size();
            let x = match text.h_align {
                TextHAlign::Left => text.x,
                TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
                TextHAlign::Right => text.x - f64::from(text_width),
            };

            apply_color(context, text.color);
            context.move_to(x, text.y);
            pangocairo::functions::show_layout(context, &layout);
            stats.texts_drawn += 1;
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> TimelineResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> TimelineResult<()> {
        self.render_with_context(context, frame)
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn append_rect_path(context: &Context, rect: crate::render::RectPrimitive) {
    if rect.corner_radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }

    let radius = rect
        .corner_radius
        .min(rect.width * 0.5)
        .min(rect.height * 0.5);
    let left = rect.x;
    let top = rect.y;
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;

    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn apply_dash(context: &Context, style: StrokeStyle) {
    match style {
        StrokeStyle::Solid => context.set_dash(&[], 0.0),
        StrokeStyle::Dashed { on_px, off_px } => context.set_dash(&[on_px, off_px], 0.0),
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> TimelineError {
    TimelineError::InvalidData(format!("{prefix}: {err}"))
}
