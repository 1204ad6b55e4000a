use crate::document::Rgb;

/// One buffered drawing instruction. Coordinates are points from the page's
/// top-left corner; `finalize` flips them for the output format.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        /// Baseline.
        y: f32,
        text: String,
        size: f32,
        bold: bool,
        color: Rgb,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
        thickness: f32,
    },
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// A laid-out page awaiting its footer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageBuffer {
    /// Zero-based.
    pub index: usize,
    pub ops: Vec<DrawOp>,
    /// Table body rows placed on this page (totals rows excluded).
    pub body_rows: usize,
}

impl PageBuffer {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn text(&mut self, x: f32, y: f32, text: impl Into<String>, size: f32, bold: bool, color: Rgb) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text {
            x,
            y,
            text,
            size,
            bold,
            color,
        });
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Rgb) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
        });
    }

    pub fn hline(&mut self, x1: f32, x2: f32, y: f32, color: Rgb, thickness: f32) {
        self.ops.push(DrawOp::Line {
            x1,
            y1: y,
            x2,
            y2: y,
            color,
            thickness,
        });
    }

    /// Every text run on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}
