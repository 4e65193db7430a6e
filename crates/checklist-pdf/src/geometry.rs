//! Page geometry and coordinate conversion
//!
//! Layout works top-down (y grows toward the bottom of the page) the way the
//! printed form is specified. PDF space has its origin bottom-left, so the
//! writer flips y once at output time.

use serde::{Deserialize, Serialize};

/// Fixed page size and margins, in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// Cursor position at the start of every page, below the running header
    pub body_top: f32,
}

impl Default for PageGeometry {
    /// A4 portrait
    fn default() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin_left: 20.0,
            margin_right: 20.0,
            margin_top: 25.0,
            margin_bottom: 30.0,
            body_top: 80.0,
        }
    }
}

impl PageGeometry {
    pub fn left(&self) -> f32 {
        self.margin_left
    }

    pub fn right(&self) -> f32 {
        self.width - self.margin_right
    }

    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    pub fn content_width(&self) -> f32 {
        self.right() - self.left()
    }

    /// Lowest y content may reach before a page break
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin_bottom
    }

    /// Vertical space available to body content on one page
    pub fn body_height(&self) -> f32 {
        self.bottom_limit() - self.body_top
    }

    /// Convert a top-down layout y to PDF user space
    pub fn to_pdf_y(&self, y: f32) -> f32 {
        self.height - y
    }
}
