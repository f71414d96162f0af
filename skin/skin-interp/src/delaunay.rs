//! Delaunay triangulation of grid cell centers with point location.

use skin_types::{Grid, GridCell, area_triangle, eq_almost};
use tracing::debug;
use triangle_rs as triangle;

use crate::error::{InterpError, Result};

/// Absolute tolerance on the sub-area sum used for point location.
pub const LOCATE_EPS: f64 = 1e-9;

/// Triangle containing a query point, with its barycentric coordinates.
///
/// `barycentric[i]` is the weight of `vertices[i]`; the weights sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleLocation {
    /// Point indices of the triangle corners.
    pub vertices: [usize; 3],
    /// Barycentric weight of each corner.
    pub barycentric: [f64; 3],
}

impl TriangleLocation {
    /// Weighted sum of `f(vertex)` over the three corners.
    #[must_use]
    pub fn combine(&self, mut f: impl FnMut(usize) -> f64) -> f64 {
        self.vertices
            .iter()
            .zip(self.barycentric)
            .map(|(&v, w)| w * f(v))
            .sum()
    }
}

/// A triangulation over a private copy of a grid's cell centers.
///
/// The source grid may change afterwards without affecting the
/// triangulation. No values are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Delaunay {
    points: Vec<GridCell>,
    triangles: Vec<[usize; 3]>,
}

impl Delaunay {
    /// Triangulates the cell centers of `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`InterpError::Triangulation`] if the grid has fewer than three
    /// cells, or if the engine yields no triangles or triangles that do not
    /// have exactly three corners.
    pub fn new(grid: &Grid) -> Result<Self> {
        let points = grid.cells().to_vec();
        if points.len() < 3 {
            return Err(InterpError::triangulation(format!(
                "at least 3 points are needed, got {}",
                points.len()
            )));
        }
        if all_collinear(&points) {
            return Err(InterpError::triangulation("all points are collinear"));
        }

        let nodes: Vec<f64> = points.iter().flat_map(|c| [c.x, c.y]).collect();
        let mut builder = triangle::Builder::new();
        builder.add_nodes(&nodes);
        let mesh = builder.set_switches("Q").build();

        let mut triangles = Vec::new();
        for t in mesh.triangle_iter() {
            let corners: Vec<usize> = t.iter().copied().collect();
            let &[a, b, c] = corners.as_slice() else {
                return Err(InterpError::triangulation(format!(
                    "expected 3 corners per triangle, got {}",
                    corners.len()
                )));
            };
            triangles.push([a, b, c]);
        }

        let delaunay = Self::from_triangles(points, triangles)?;
        debug!(
            points = delaunay.points.len(),
            triangles = delaunay.triangles.len(),
            "Triangulated grid"
        );
        Ok(delaunay)
    }

    /// Builds a triangulation from an explicit triangle list.
    ///
    /// # Errors
    ///
    /// Returns [`InterpError::Triangulation`] for an empty list and
    /// [`InterpError::InvalidTriangle`] if a corner index is out of range.
    pub fn from_triangles(points: Vec<GridCell>, triangles: Vec<[usize; 3]>) -> Result<Self> {
        if triangles.is_empty() {
            return Err(InterpError::triangulation("no triangles"));
        }
        for (triangle, corners) in triangles.iter().enumerate() {
            if let Some(&index) = corners.iter().find(|&&i| i >= points.len()) {
                return Err(InterpError::InvalidTriangle {
                    triangle,
                    index,
                    len: points.len(),
                });
            }
        }
        Ok(Self { points, triangles })
    }

    /// Triangulated points.
    #[must_use]
    pub fn points(&self) -> &[GridCell] {
        &self.points
    }

    /// Triangles as triples of point indices.
    #[must_use]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Number of triangles.
    #[must_use]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Finds the first triangle containing `p`, boundary included.
    ///
    /// `p` is inside when the three sub-triangle areas it forms sum to the
    /// whole area within [`LOCATE_EPS`]. Triangles are scanned in order, so a
    /// point on a shared edge resolves to the earliest one. Zero-area
    /// triangles never match.
    #[must_use]
    pub fn triangle_info_for_point(&self, p: GridCell) -> Option<TriangleLocation> {
        self.triangles.iter().find_map(|&vertices| {
            let [n0, n1, n2] = vertices.map(|i| self.points[i]);
            let whole = area_triangle(n0, n1, n2);
            if whole <= 0.0 {
                return None;
            }
            let a0 = area_triangle(p, n1, n2);
            let a1 = area_triangle(n0, p, n2);
            let a2 = area_triangle(n0, n1, p);
            eq_almost(a0 + a1 + a2, whole, LOCATE_EPS).then(|| TriangleLocation {
                vertices,
                barycentric: [a0 / whole, a1 / whole, a2 / whole],
            })
        })
    }
}

fn all_collinear(points: &[GridCell]) -> bool {
    let Some(&first) = points.first() else {
        return true;
    };
    let Some(&second) = points.iter().find(|&&p| p != first) else {
        return true;
    };
    points
        .iter()
        .all(|&p| area_triangle(first, second, p) <= 0.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Delaunay {
        Delaunay::from_triangles(
            vec![
                GridCell::new(0.0, 0.0),
                GridCell::new(1.0, 0.0),
                GridCell::new(1.0, 1.0),
                GridCell::new(0.0, 1.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_locate_inside() {
        let d = unit_square();
        let loc = d.triangle_info_for_point(GridCell::new(0.75, 0.25)).unwrap();
        assert_eq!(loc.vertices, [0, 1, 2]);
        let sum: f64 = loc.barycentric.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        assert_relative_eq!(loc.barycentric[0], 0.25, epsilon = 1e-12);
        assert_relative_eq!(loc.barycentric[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(loc.barycentric[2], 0.25, epsilon = 1e-12);

        let loc = d.triangle_info_for_point(GridCell::new(0.25, 0.75)).unwrap();
        assert_eq!(loc.vertices, [0, 2, 3]);
    }

    #[test]
    fn test_locate_vertex() {
        let d = unit_square();
        let loc = d.triangle_info_for_point(GridCell::new(1.0, 0.0)).unwrap();
        assert_relative_eq!(loc.barycentric[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(loc.barycentric[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_locate_shared_edge_takes_first_triangle() {
        let d = unit_square();
        let loc = d.triangle_info_for_point(GridCell::new(0.5, 0.5)).unwrap();
        assert_eq!(loc.vertices, [0, 1, 2]);
        assert_relative_eq!(loc.barycentric[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_locate_outside() {
        let d = unit_square();
        assert!(d.triangle_info_for_point(GridCell::new(1.5, 0.5)).is_none());
        assert!(d.triangle_info_for_point(GridCell::new(-0.01, -0.01)).is_none());
    }

    #[test]
    fn test_locate_skips_degenerate_triangles() {
        let d = Delaunay::from_triangles(
            vec![
                GridCell::new(0.0, 0.0),
                GridCell::new(1.0, 1.0),
                GridCell::new(2.0, 2.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        assert!(d.triangle_info_for_point(GridCell::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_all_collinear() {
        let line = [
            GridCell::new(0.0, 0.0),
            GridCell::new(0.0, 0.0),
            GridCell::new(1.0, 2.0),
            GridCell::new(2.0, 4.0),
        ];
        assert!(all_collinear(&line));
        assert!(all_collinear(&line[..1]));
        assert!(!all_collinear(&[
            GridCell::new(0.0, 0.0),
            GridCell::new(1.0, 0.0),
            GridCell::new(0.0, 1.0),
        ]));
    }

    #[test]
    fn test_combine() {
        let loc = TriangleLocation {
            vertices: [2, 0, 1],
            barycentric: [0.5, 0.25, 0.25],
        };
        let values = [4.0, 8.0, 2.0];
        assert_relative_eq!(loc.combine(|i| values[i]), 4.0);
    }

    #[test]
    fn test_from_triangles_validation() {
        let points = vec![GridCell::new(0.0, 0.0), GridCell::new(1.0, 0.0)];
        assert!(matches!(
            Delaunay::from_triangles(points.clone(), vec![]),
            Err(InterpError::Triangulation { .. })
        ));
        assert!(matches!(
            Delaunay::from_triangles(points, vec![[0, 1, 2]]),
            Err(InterpError::InvalidTriangle { triangle: 0, index: 2, len: 2 })
        ));
    }
}
