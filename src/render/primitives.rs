use crate::error::{TimelineError, TimelineResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Builds a color from 8-bit channels, e.g. palette constants.
    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn validate(self) -> TimelineResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(TimelineError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Stroke dash pattern shared by lines, curves, and rect borders.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed {
        on_px: f64,
        off_px: f64,
    },
}

impl StrokeStyle {
    pub fn validate(self) -> TimelineResult<()> {
        if let Self::Dashed { on_px, off_px } = self {
            if !on_px.is_finite() || !off_px.is_finite() || on_px <= 0.0 || off_px <= 0.0 {
                return Err(TimelineError::InvalidData(
                    "dash segments must be finite and > 0".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub style: StrokeStyle,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            style: StrokeStyle::Solid,
        }
    }

    pub fn validate(self) -> TimelineResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(TimelineError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(TimelineError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.style.validate()?;
        self.color.validate()
    }
}

/// Draw command for one filled rectangle, optionally bordered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    pub corner_radius: f64,
    pub border: Option<RectBorder>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectBorder {
    pub color: Color,
    pub stroke_width: f64,
    pub style: StrokeStyle,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill,
            corner_radius: 0.0,
            border: None,
        }
    }

    #[must_use]
    pub fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.corner_radius = corner_radius;
        self
    }

    #[must_use]
    pub fn with_border(mut self, color: Color, stroke_width: f64, style: StrokeStyle) -> Self {
        self.border = Some(RectBorder {
            color,
            stroke_width,
            style,
        });
        self
    }

    pub fn validate(self) -> TimelineResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(TimelineError::InvalidData(
                "rect position must be finite".to_owned(),
            ));
        }
        if !self.width.is_finite() || !self.height.is_finite() || self.width < 0.0 || self.height < 0.0
        {
            return Err(TimelineError::InvalidData(
                "rect size must be finite and >= 0".to_owned(),
            ));
        }
        if !self.corner_radius.is_finite() || self.corner_radius < 0.0 {
            return Err(TimelineError::InvalidData(
                "rect corner radius must be finite and >= 0".to_owned(),
            ));
        }
        if let Some(border) = self.border {
            if !border.stroke_width.is_finite() || border.stroke_width <= 0.0 {
                return Err(TimelineError::InvalidData(
                    "rect border width must be finite and > 0".to_owned(),
                ));
            }
            border.style.validate()?;
            border.color.validate()?;
        }
        self.fill.validate()
    }
}

/// Bézier geometry for connector and chain curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurvePath {
    Quadratic {
        x0: f64,
        y0: f64,
        cx: f64,
        cy: f64,
        x1: f64,
        y1: f64,
    },
    Cubic {
        x0: f64,
        y0: f64,
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x1: f64,
        y1: f64,
    },
}

impl CurvePath {
    fn coordinates(self) -> [f64; 8] {
        match self {
            Self::Quadratic {
                x0,
                y0,
                cx,
                cy,
                x1,
                y1,
            } => [x0, y0, cx, cy, cx, cy, x1, y1],
            Self::Cubic {
                x0,
                y0,
                c1x,
                c1y,
                c2x,
                c2y,
                x1,
                y1,
            } => [x0, y0, c1x, c1y, c2x, c2y, x1, y1],
        }
    }

    /// Equivalent cubic control points, for backends without quadratic support.
    #[must_use]
    pub fn as_cubic(self) -> [f64; 8] {
        match self {
            Self::Quadratic {
                x0,
                y0,
                cx,
                cy,
                x1,
                y1,
            } => {
                let c1x = x0 + 2.0 / 3.0 * (cx - x0);
                let c1y = y0 + 2.0 / 3.0 * (cy - y0);
                let c2x = x1 + 2.0 / 3.0 * (cx - x1);
                let c2y = y1 + 2.0 / 3.0 * (cy - y1);
                [x0, y0, c1x, c1y, c2x, c2y, x1, y1]
            }
            cubic => cubic.coordinates(),
        }
    }
}

/// Draw command for one stroked Bézier curve in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePrimitive {
    pub path: CurvePath,
    pub stroke_width: f64,
    pub color: Color,
    pub style: StrokeStyle,
}

impl CurvePrimitive {
    #[must_use]
    pub const fn new(path: CurvePath, stroke_width: f64, color: Color, style: StrokeStyle) -> Self {
        Self {
            path,
            stroke_width,
            color,
            style,
        }
    }

    pub fn validate(self) -> TimelineResult<()> {
        if self.path.coordinates().iter().any(|v| !v.is_finite()) {
            return Err(TimelineError::InvalidData(
                "curve coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(TimelineError::InvalidData(
                "curve stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.style.validate()?;
        self.color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    pub weight: FontWeight,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
            weight: FontWeight::Normal,
        }
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn validate(&self) -> TimelineResult<()> {
        if self.text.is_empty() {
            return Err(TimelineError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(TimelineError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(TimelineError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}
