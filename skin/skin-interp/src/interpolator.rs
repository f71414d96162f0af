//! Offline/online linear interpolation between grids.

use skin_types::{Grid, erase_by_indices};
use tracing::{debug, warn};

use crate::delaunay::{Delaunay, TriangleLocation};
use crate::error::{InterpError, Result};

/// Policy for target cells outside the source triangulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nipp {
    /// Erase those cells from the target grid during the offline phase.
    RemoveFromGrid,
    /// Keep those cells and write zero to all their values.
    #[default]
    InterpolateToZero,
}

/// Where a target cell takes its value from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetCellMapping {
    /// Inside a source triangle.
    Mapped(TriangleLocation),
    /// Outside every source triangle.
    NonInterpolable,
}

impl TargetCellMapping {
    /// Returns `true` for [`TargetCellMapping::NonInterpolable`].
    #[must_use]
    pub const fn is_non_interpolable(&self) -> bool {
        matches!(self, Self::NonInterpolable)
    }
}

/// Two-phase interpolation contract.
///
/// `offline` inspects the geometry of both grids once; `interpolate` then
/// transfers values as often as needed while the geometry is unchanged.
pub trait Interpolator {
    /// Prepares the mapping from `from` onto `to`, possibly editing `to`.
    ///
    /// # Errors
    ///
    /// Fails if the grids' dimensions differ or `from` cannot be
    /// triangulated.
    fn offline(&mut self, from: &Grid, to: &mut Grid) -> Result<()>;

    /// Writes interpolated values of `from` into `to`.
    ///
    /// # Errors
    ///
    /// Fails if the dimensions differ or the offline phase is missing or
    /// stale.
    fn interpolate(&self, from: &Grid, to: &mut Grid) -> Result<()>;
}

#[derive(Debug, Clone)]
struct Session {
    source_cells: usize,
    mappings: Vec<TargetCellMapping>,
}

/// Piecewise-linear interpolation over a Delaunay triangulation.
///
/// # Example
///
/// ```
/// use skin_interp::{Interpolator, LinearDelaunayInterpolator, Nipp};
/// use skin_types::{CellShape, Grid};
///
/// let mut from = Grid::from_sensors(1, CellShape::circle(0.1), [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
/// from.set_raw_values(vec![0.0, 1.0, 2.0]).unwrap();
/// let mut to = Grid::from_sensors(1, CellShape::square(0.1), [[0.5, 0.5], [2.0, 2.0]]);
///
/// let mut interp = LinearDelaunayInterpolator::new(Nipp::RemoveFromGrid);
/// interp.offline(&from, &mut to).unwrap();
/// interp.interpolate(&from, &mut to).unwrap();
///
/// assert_eq!(to.num_cells(), 1);
/// assert!((to.value(0, 0).unwrap() - 1.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinearDelaunayInterpolator {
    policy: Nipp,
    session: Option<Session>,
}

impl LinearDelaunayInterpolator {
    /// Creates an interpolator with the given policy.
    #[must_use]
    pub const fn new(policy: Nipp) -> Self {
        Self {
            policy,
            session: None,
        }
    }

    /// Configured non-interpolable point policy.
    #[must_use]
    pub const fn policy(&self) -> Nipp {
        self.policy
    }

    /// Returns `true` once `offline` has succeeded.
    #[must_use]
    pub const fn is_prepared(&self) -> bool {
        self.session.is_some()
    }

    /// Per-target-cell mappings from the last offline phase.
    #[must_use]
    pub fn mappings(&self) -> Option<&[TargetCellMapping]> {
        self.session.as_ref().map(|s| s.mappings.as_slice())
    }
}

fn check_dims(from: &Grid, to: &Grid) -> Result<()> {
    if from.dim() == to.dim() {
        Ok(())
    } else {
        Err(InterpError::DimensionMismatch {
            from: from.dim(),
            to: to.dim(),
        })
    }
}

impl Interpolator for LinearDelaunayInterpolator {
    fn offline(&mut self, from: &Grid, to: &mut Grid) -> Result<()> {
        check_dims(from, to)?;
        self.session = None;

        let delaunay = Delaunay::new(from)?;

        let mut bad_cells = Vec::new();
        let mut mappings: Vec<TargetCellMapping> = to
            .cells()
            .iter()
            .enumerate()
            .map(|(i, &cell)| match delaunay.triangle_info_for_point(cell) {
                Some(loc) => TargetCellMapping::Mapped(loc),
                None => {
                    bad_cells.push(i);
                    TargetCellMapping::NonInterpolable
                }
            })
            .collect();
        bad_cells.sort_unstable();
        bad_cells.dedup();

        if !bad_cells.is_empty() {
            warn!(
                count = bad_cells.len(),
                policy = ?self.policy,
                "Target cells outside the source triangulation"
            );
        }

        match self.policy {
            Nipp::RemoveFromGrid => {
                to.erase(&bad_cells);
                erase_by_indices(&mut mappings, &bad_cells, 1);
                to.set_bad_cells(Vec::new());
            }
            Nipp::InterpolateToZero => to.set_bad_cells(bad_cells),
        }

        debug!(
            source_cells = from.num_cells(),
            target_cells = to.num_cells(),
            triangles = delaunay.num_triangles(),
            "Interpolator offline phase complete"
        );

        self.session = Some(Session {
            source_cells: from.num_cells(),
            mappings,
        });
        Ok(())
    }

    fn interpolate(&self, from: &Grid, to: &mut Grid) -> Result<()> {
        check_dims(from, to)?;
        let session = self.session.as_ref().ok_or(InterpError::NotPrepared)?;
        if from.num_cells() != session.source_cells {
            return Err(InterpError::StaleMapping {
                what: "source grid",
                expected: session.source_cells,
                actual: from.num_cells(),
            });
        }
        if to.num_cells() != session.mappings.len() {
            return Err(InterpError::StaleMapping {
                what: "target grid",
                expected: session.mappings.len(),
                actual: to.num_cells(),
            });
        }

        let dim = to.dim();
        let src = from.raw_values();
        let dst = to.raw_values_mut();
        for (mapping, out) in session.mappings.iter().zip(dst.chunks_exact_mut(dim.max(1))) {
            match mapping {
                TargetCellMapping::NonInterpolable => out.fill(0.0),
                TargetCellMapping::Mapped(loc) => {
                    for (component, value) in out.iter_mut().enumerate() {
                        *value = loc.combine(|v| src[v * dim + component]);
                    }
                }
            }
        }
        Ok(())
    }
}
