//! Pixel geometry for gallery layouts.
//!
//! All coordinates are integer pixels measured from the top-left corner of
//! the canvas.

use std::fmt;

use serde::Serialize;

/// Position assigned to one entity by the grid layout.
///
/// `row` and `column` are 1-based. `x`/`y` are the top-left corner of the
/// avatar and are never smaller than the outer border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Placement {
    x: u32,
    y: u32,
    row: u32,
    column: u32,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(x: u32, y: u32, row: u32, column: u32) -> Self {
        Self { x, y, row, column }
    }

    /// Horizontal offset of the top-left corner.
    pub fn x(self) -> u32 {
        self.x
    }

    /// Vertical offset of the top-left corner.
    pub fn y(self) -> u32 {
        self.y
    }

    /// 1-based row index.
    pub fn row(self) -> u32 {
        self.row
    }

    /// 1-based column index.
    pub fn column(self) -> u32 {
        self.column
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) at row {} column {}",
            self.x, self.y, self.row, self.column
        )
    }
}

/// Declared width and height of the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct CanvasBounds {
    width: u32,
    height: u32,
}

impl CanvasBounds {
    /// Creates new canvas bounds.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Canvas width in pixels.
    pub fn width(self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(self) -> u32 {
        self.height
    }
}

impl fmt::Display for CanvasBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_accessors() {
        let placement = Placement::new(52, 102, 3, 2);
        assert_eq!(placement.x(), 52);
        assert_eq!(placement.y(), 102);
        assert_eq!(placement.row(), 3);
        assert_eq!(placement.column(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Placement::new(2, 52, 2, 1).to_string(),
            "(2, 52) at row 2 column 1"
        );
        assert_eq!(CanvasBounds::new(152, 102).to_string(), "152x102");
    }
}
