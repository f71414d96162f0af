//! Grid cell positions.

use nalgebra::Point2;

/// Position of a cell center in the skin plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl GridCell {
    /// Creates a cell at `(x, y)`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Converts to a nalgebra point.
    #[must_use]
    pub fn to_point(self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

impl From<[f64; 2]> for GridCell {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for GridCell {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point2<f64>> for GridCell {
    fn from(p: Point2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<GridCell> for Point2<f64> {
    fn from(c: GridCell) -> Self {
        c.to_point()
    }
}
