//! Cell shapes shared by every cell of a grid.
//!
//! A shape reports its extents (`dx`, `dy`) and radius (`r`). Queries that
//! match the concrete shape are exact; the others return an equal-area
//! approximation and log a warning. [`CellShape::area`] is always exact.

use std::f64::consts::PI;
use std::fmt;

use tracing::warn;

/// Shape of the cells of a [`Grid`](crate::Grid).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum CellShape {
    /// Axis-aligned rectangle of size `dx × dy`.
    Rectangle {
        /// Extent along x.
        dx: f64,
        /// Extent along y.
        dy: f64,
    },
    /// Axis-aligned square of side `d`.
    Square {
        /// Side length.
        d: f64,
    },
    /// Circle of radius `r`.
    Circle {
        /// Radius.
        r: f64,
    },
}

impl CellShape {
    /// Creates a rectangle.
    #[must_use]
    pub const fn rectangle(dx: f64, dy: f64) -> Self {
        Self::Rectangle { dx, dy }
    }

    /// Creates a square.
    #[must_use]
    pub const fn square(d: f64) -> Self {
        Self::Square { d }
    }

    /// Creates a circle.
    #[must_use]
    pub const fn circle(r: f64) -> Self {
        Self::Circle { r }
    }

    /// Creates the circle whose area equals `area`.
    #[must_use]
    pub fn circle_with_area(area: f64) -> Self {
        Self::Circle {
            r: (area / PI).sqrt(),
        }
    }

    /// Extent along x. Approximated for circles.
    #[must_use]
    pub fn dx(&self) -> f64 {
        match *self {
            Self::Rectangle { dx, .. } => dx,
            Self::Square { d } => d,
            Self::Circle { r } => {
                warn!(r, "circle cell shape: returning equal-area approximation of dx");
                r * PI.sqrt()
            }
        }
    }

    /// Extent along y. Approximated for circles.
    #[must_use]
    pub fn dy(&self) -> f64 {
        match *self {
            Self::Rectangle { dy, .. } => dy,
            Self::Square { d } => d,
            Self::Circle { r } => {
                warn!(r, "circle cell shape: returning equal-area approximation of dy");
                r * PI.sqrt()
            }
        }
    }

    /// Radius. Approximated for rectangles and squares.
    #[must_use]
    pub fn r(&self) -> f64 {
        match *self {
            Self::Circle { r } => r,
            Self::Rectangle { .. } | Self::Square { .. } => {
                warn!(
                    shape = self.name(),
                    "rectangular cell shape: returning equal-area approximation of r"
                );
                (self.area() / PI).sqrt()
            }
        }
    }

    /// Exact area.
    #[must_use]
    pub fn area(&self) -> f64 {
        match *self {
            Self::Rectangle { dx, dy } => dx * dy,
            Self::Square { d } => d * d,
            Self::Circle { r } => PI * r * r,
        }
    }

    /// Returns `true` for rectangles and squares.
    #[must_use]
    pub const fn is_rectangular(&self) -> bool {
        matches!(self, Self::Rectangle { .. } | Self::Square { .. })
    }

    /// Returns `true` for circles.
    #[must_use]
    pub const fn is_circle(&self) -> bool {
        matches!(self, Self::Circle { .. })
    }

    /// Short lowercase name, used in messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "rectangle",
            Self::Square { .. } => "square",
            Self::Circle { .. } => "circle",
        }
    }

    /// Distances from a cell center to the edges of its bounding box.
    ///
    /// Circles use their radius on both axes; no approximation is involved.
    #[must_use]
    pub(crate) const fn half_extents(&self) -> (f64, f64) {
        match *self {
            Self::Rectangle { dx, dy } => (0.5 * dx, 0.5 * dy),
            Self::Square { d } => (0.5 * d, 0.5 * d),
            Self::Circle { r } => (r, r),
        }
    }
}

impl fmt::Display for CellShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rectangle { dx, dy } => write!(f, "rectangle({dx} x {dy})"),
            Self::Square { d } => write!(f, "square({d})"),
            Self::Circle { r } => write!(f, "circle(r = {r})"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangle_exact() {
        let s = CellShape::rectangle(0.02, 0.01);
        assert_eq!(s.dx(), 0.02);
        assert_eq!(s.dy(), 0.01);
        assert_relative_eq!(s.area(), 0.0002);
        assert!(s.is_rectangular());
        assert!(!s.is_circle());
    }

    #[test]
    fn test_rectangle_radius_is_equal_area() {
        let s = CellShape::rectangle(2.0, 3.0);
        let r = s.r();
        assert_relative_eq!(PI * r * r, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_square_is_rectangle_with_equal_sides() {
        let s = CellShape::square(0.5);
        assert_eq!(s.dx(), 0.5);
        assert_eq!(s.dy(), 0.5);
        assert_relative_eq!(s.area(), CellShape::rectangle(0.5, 0.5).area());
        assert_relative_eq!(s.r(), CellShape::rectangle(0.5, 0.5).r());
    }

    #[test]
    fn test_circle() {
        let s = CellShape::circle(1.0);
        assert_eq!(s.r(), 1.0);
        assert_relative_eq!(s.area(), PI);
        // Equal-area square
        assert_relative_eq!(s.dx() * s.dy(), s.area(), epsilon = 1e-12);
        assert!(s.is_circle());
    }

    #[test]
    fn test_circle_with_area() {
        let s = CellShape::circle_with_area(0.002);
        assert_relative_eq!(s.area(), 0.002, epsilon = 1e-15);
    }

    #[test]
    fn test_half_extents() {
        assert_eq!(CellShape::rectangle(2.0, 4.0).half_extents(), (1.0, 2.0));
        assert_eq!(CellShape::circle(3.0).half_extents(), (3.0, 3.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellShape::square(1.0).to_string(), "square(1)");
        assert_eq!(CellShape::circle(2.0).name(), "circle");
    }
}
