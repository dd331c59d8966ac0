use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[must_use]
    pub fn class(self) -> ViewportClass {
        ViewportClass::from_width(self.width)
    }
}

/// Width breakpoints driving target axis width and label sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewportClass {
    Narrow,
    Medium,
    Wide,
}

impl ViewportClass {
    #[must_use]
    pub fn from_width(width: u32) -> Self {
        if width < 768 {
            Self::Narrow
        } else if width < 1024 {
            Self::Medium
        } else {
            Self::Wide
        }
    }
}
