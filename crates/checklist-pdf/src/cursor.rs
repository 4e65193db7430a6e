//! Explicit layout cursor

use serde::Serialize;

/// Current page index and vertical position (top-down, points)
///
/// Owned by one layout run. Every drawing operation reads and advances it;
/// there is no shared or global cursor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutCursor {
    pub page: usize,
    pub y: f32,
}

impl LayoutCursor {
    pub fn new(top: f32) -> Self {
        Self { page: 0, y: top }
    }

    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    pub fn next_page(&mut self, top: f32) {
        self.page += 1;
        self.y = top;
    }

    /// Whether `height` more points fit above `limit`
    pub fn fits(&self, height: f32, limit: f32) -> bool {
        self.y + height <= limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_moves() {
        let mut cursor = LayoutCursor::new(80.0);
        cursor.advance(12.0);
        assert_eq!(cursor.y, 92.0);
        assert!(cursor.fits(8.0, 100.0));
        assert!(!cursor.fits(8.5, 100.0));

        cursor.next_page(80.0);
        assert_eq!(cursor, LayoutCursor { page: 1, y: 80.0 });
    }
}
