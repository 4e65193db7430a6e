//! Backend-independent display list
//!
//! Layout produces pages of positioned drawing operations in top-down
//! coordinates with alignment already resolved. The writer only translates
//! them; it never measures or moves anything.

use crate::geometry::PageGeometry;
use crate::metrics::{Font, TextMeasure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the text baseline
    Text {
        x: f32,
        y: f32,
        text: String,
        font: Font,
        size: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
    },
    /// Stroked rectangle with its top-left corner at (`x`, `y`)
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }

    /// Baseline of the first text op equal to `needle`
    pub fn text_y(&self, needle: &str) -> Option<f32> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Text { text, y, .. } if text == needle => Some(*y),
            _ => None,
        })
    }
}

/// Draws onto one page, resolving alignment with the active measure
pub struct Painter<'a> {
    page: &'a mut Page,
    geometry: &'a PageGeometry,
    measure: &'a dyn TextMeasure,
}

impl<'a> Painter<'a> {
    pub fn new(page: &'a mut Page, geometry: &'a PageGeometry, measure: &'a dyn TextMeasure) -> Self {
        Self {
            page,
            geometry,
            measure,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        self.geometry
    }

    pub fn text_width(&self, text: &str, font: Font, size: f32) -> f32 {
        self.measure.text_width(text, font, size)
    }

    /// Place `text` with its anchor at `x`; blank text draws nothing
    pub fn text(&mut self, x: f32, y: f32, text: &str, font: Font, size: f32, align: Align) {
        if text.trim().is_empty() {
            return;
        }
        let width = self.measure.text_width(text, font, size);
        let x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        self.page.ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            font,
            size,
        });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
        self.page.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
        });
    }

    /// Full-width horizontal rule between the margins
    pub fn rule(&mut self, y: f32, width: f32) {
        let (left, right) = (self.geometry.left(), self.geometry.right());
        self.line(left, y, right, y, width);
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32) {
        self.page.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            line_width,
        });
    }
}
