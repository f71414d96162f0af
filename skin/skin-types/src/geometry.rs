//! Small planar geometry helpers shared by grids and interpolators.

use crate::error::{GridError, Result};
use crate::GridCell;

/// Returns `true` when `|a - b| < |eps|`.
#[must_use]
#[inline]
pub fn eq_almost(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps.abs()
}

/// Unsigned area of the triangle spanned by three points.
///
/// Degenerate (collinear) triangles have zero area.
///
/// # Example
///
/// ```
/// use skin_types::{area_triangle, GridCell};
///
/// let area = area_triangle(
///     GridCell::new(16.0, 15.0),
///     GridCell::new(23.0, 30.0),
///     GridCell::new(50.0, 25.0),
/// );
/// assert!((area - 220.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn area_triangle(p1: GridCell, p2: GridCell, p3: GridCell) -> f64 {
    (0.5 * (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y))).abs()
}

/// Layout of equal segments centered on an interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentPlacement {
    /// Number of whole segments that fit in the interval.
    pub num: usize,
    /// Start of the first segment.
    pub origin: f64,
    /// Middle of the first segment.
    pub first_center: f64,
}

/// Places as many segments of length `dt` as fit in `[t0, t1]`, centering
/// the run so the leftover is split evenly on both ends.
///
/// # Errors
///
/// Returns [`GridError::InvalidSegments`] if `t1 < t0` or `dt <= 0`.
///
/// # Example
///
/// ```
/// use skin_types::place_segments;
///
/// let p = place_segments(1.0, 3.5, 1.0).unwrap();
/// assert_eq!(p.num, 2);
/// assert!((p.origin - 1.25).abs() < 1e-12);
/// assert!((p.first_center - 1.75).abs() < 1e-12);
/// ```
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn place_segments(t0: f64, t1: f64, dt: f64) -> Result<SegmentPlacement> {
    let diff = t1 - t0;
    if diff < 0.0 || dt <= 0.0 || !diff.is_finite() || !dt.is_finite() {
        return Err(GridError::InvalidSegments { t0, t1, dt });
    }

    let num = (diff / dt).floor();
    let covered = num * dt;
    let origin = if eq_almost(covered, diff, 1e-50) {
        t0
    } else {
        t0 + 0.5 * (diff - covered)
    };

    Ok(SegmentPlacement {
        num: num as usize,
        origin,
        first_center: origin + 0.5 * dt,
    })
}
