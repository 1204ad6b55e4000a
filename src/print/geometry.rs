use crate::config::{LayoutSettings, Orientation, PageSize};

/// Fixed page metrics, in points, measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub bottom_margin: f32,
    pub row_height: f32,
    pub header_row_height: f32,
    pub font_size: f32,
    pub title_font_size: f32,
}

impl Geometry {
    pub fn from_settings(settings: &LayoutSettings) -> Self {
        let (w, h) = match settings.page_size {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
        };
        let (width, height) = match settings.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        };
        Self {
            width,
            height,
            margin_left: settings.margin_left,
            margin_right: settings.margin_right,
            margin_top: settings.margin_top,
            // Degenerate settings would make every row overflow forever.
            bottom_margin: settings.bottom_margin.clamp(0.0, height / 2.0),
            row_height: settings.row_height.max(4.0),
            header_row_height: settings.header_row_height.max(4.0),
            font_size: settings.font_size.max(4.0),
            title_font_size: settings.title_font_size.max(4.0),
        }
    }

    pub fn content_width(&self) -> f32 {
        (self.width - self.margin_left - self.margin_right).max(1.0)
    }

    pub fn right(&self) -> f32 {
        self.width - self.margin_right
    }

    /// No row may extend below this line.
    pub fn body_limit(&self) -> f32 {
        self.height - self.bottom_margin
    }

    /// Baseline of the page footer, independent of the cursor.
    pub fn footer_baseline(&self) -> f32 {
        self.height - self.bottom_margin / 2.0
    }

    pub fn line_height(&self) -> f32 {
        self.font_size * 1.5
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::from_settings(&LayoutSettings::default())
    }
}
