//! The [`Grid`]: cell positions, per-cell values and a shared cell shape.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GridError, Result};
use crate::geometry::place_segments;
use crate::{CellShape, GridCell};

/// Axis-aligned bounding box of a grid.
///
/// Derived from cell centers expanded by the shape's half extents (or radius
/// for circles). An empty grid has `min = f64::MAX` and `max = f64::MIN`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// Smallest x.
    pub min_x: f64,
    /// Smallest y.
    pub min_y: f64,
    /// Largest x.
    pub max_x: f64,
    /// Largest y.
    pub max_y: f64,
}

impl Bounds {
    /// Bounds of a grid without cells.
    pub const EMPTY: Self = Self {
        min_x: f64::MAX,
        min_y: f64::MAX,
        max_x: f64::MIN,
        max_y: f64::MIN,
    };

    /// Returns `true` if no cell contributed to these bounds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Width along x, zero for empty bounds.
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.max_x - self.min_x).max(0.0)
    }

    /// Height along y, zero for empty bounds.
    #[must_use]
    pub fn height(&self) -> f64 {
        (self.max_y - self.min_y).max(0.0)
    }

    fn of(cells: &[GridCell], shape: &CellShape) -> Self {
        let (ex, ey) = shape.half_extents();
        cells.iter().fold(Self::EMPTY, |b, c| Self {
            min_x: b.min_x.min(c.x - ex),
            min_y: b.min_y.min(c.y - ey),
            max_x: b.max_x.max(c.x + ex),
            max_y: b.max_y.max(c.y + ey),
        })
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A set of cells sharing one shape, each carrying `dim` values.
///
/// Values are stored flattened: the components of cell `i` live at
/// `dim * i .. dim * (i + 1)`. `bad_cells` is bookkeeping for interpolators
/// and is not interpreted by the grid itself.
///
/// # Example
///
/// ```
/// use skin_types::{CellShape, Grid};
///
/// let mut grid = Grid::from_sensors(3, CellShape::square(0.01), [[0.0, 0.0], [0.01, 0.0]]);
/// grid.set_value(1, 2, 4.5).unwrap();
///
/// assert_eq!(grid.num_cells(), 2);
/// assert_eq!(grid.raw_values().len(), 6);
/// assert_eq!(grid.values_of(1).unwrap(), &[0.0, 0.0, 4.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid {
    dim: usize,
    shape: CellShape,
    cells: Vec<GridCell>,
    values: Vec<f64>,
    bad_cells: Vec<usize>,
    bounds: Bounds,
}

impl Grid {
    /// Builds a grid whose cells are exactly `positions`, in order.
    ///
    /// Values are zero-initialized.
    pub fn from_sensors<I>(dim: usize, shape: CellShape, positions: I) -> Self
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: Into<GridCell>,
    {
        let iter = positions.into_iter();
        let mut cells = Vec::with_capacity(iter.len());
        cells.extend(iter.map(Into::into));
        Self::with_cells(dim, shape, cells)
    }

    /// Builds a grid without cells.
    #[must_use]
    pub fn from_empty(dim: usize, shape: CellShape) -> Self {
        Self::with_cells(dim, shape, Vec::new())
    }

    /// Tiles the rectangle `[x0, x1] × [y0, y1]` with non-overlapping cells.
    ///
    /// The tiling is centered when the cells do not divide the rectangle
    /// evenly. Cells are ordered column by column (x outer, y inner).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NotImplemented`] for circle shapes and
    /// [`GridError::InvalidSegments`] if the rectangle is inverted.
    ///
    /// # Example
    ///
    /// ```
    /// use skin_types::{CellShape, Grid};
    ///
    /// let grid = Grid::from_fill(1, CellShape::square(1.0), 0.0, 0.0, 3.0, 2.5).unwrap();
    /// assert_eq!(grid.num_cells(), 6);
    /// assert!((grid.cell(0).unwrap().y - 0.75).abs() < 1e-12);
    /// ```
    #[allow(clippy::cast_precision_loss)]
    pub fn from_fill(
        dim: usize,
        shape: CellShape,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    ) -> Result<Self> {
        if shape.is_circle() {
            return Err(GridError::NotImplemented {
                operation: "filling",
                shape: shape.name(),
            });
        }

        let dx = shape.dx();
        let dy = shape.dy();
        let segm_x = place_segments(x0, x1, dx)?;
        let segm_y = place_segments(y0, y1, dy)?;

        let mut cells = Vec::with_capacity(segm_x.num * segm_y.num);
        for ix in 0..segm_x.num {
            let x = segm_x.first_center + ix as f64 * dx;
            for iy in 0..segm_y.num {
                let y = segm_y.first_center + iy as f64 * dy;
                cells.push(GridCell::new(x, y));
            }
        }

        debug!(
            nx = segm_x.num,
            ny = segm_y.num,
            shape = %shape,
            "Filled rectangular grid"
        );

        Ok(Self::with_cells(dim, shape, cells))
    }

    /// Tiles the bounding box of `other`. See [`Grid::from_fill`].
    ///
    /// # Errors
    ///
    /// Same as [`Grid::from_fill`]; an empty `other` has inverted bounds and
    /// fails with [`GridError::InvalidSegments`].
    pub fn from_fill_bounds(dim: usize, shape: CellShape, other: &Self) -> Result<Self> {
        let b = other.bounds();
        Self::from_fill(dim, shape, b.min_x, b.min_y, b.max_x, b.max_y)
    }

    fn with_cells(dim: usize, shape: CellShape, cells: Vec<GridCell>) -> Self {
        let bounds = Bounds::of(&cells, &shape);
        Self {
            dim,
            shape,
            values: vec![0.0; dim * cells.len()],
            cells,
            bad_cells: Vec::new(),
            bounds,
        }
    }

    /// Replaces this grid's cells with the cell positions of `other`.
    ///
    /// The shape and dimension of `self` are kept; values are zeroed and the
    /// bad-cell list is cleared.
    pub fn clone_structure(&mut self, other: &Self) {
        self.cells.clone_from(&other.cells);
        self.values.clear();
        self.values.resize(self.dim * self.cells.len(), 0.0);
        self.bad_cells.clear();
        self.update_bounds();
    }

    /// Number of value components per cell.
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Shape shared by all cells.
    #[must_use]
    pub const fn shape(&self) -> &CellShape {
        &self.shape
    }

    /// Number of cells.
    #[must_use]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cell positions.
    #[must_use]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Position of cell `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CellOutOfBounds`] if `index >= num_cells()`.
    pub fn cell(&self, index: usize) -> Result<GridCell> {
        self.cells
            .get(index)
            .copied()
            .ok_or(GridError::CellOutOfBounds {
                index,
                len: self.cells.len(),
            })
    }

    fn value_index(&self, index: usize, component: usize) -> Result<usize> {
        if index >= self.cells.len() {
            return Err(GridError::CellOutOfBounds {
                index,
                len: self.cells.len(),
            });
        }
        if component >= self.dim {
            return Err(GridError::ComponentOutOfBounds {
                component,
                dim: self.dim,
            });
        }
        Ok(index * self.dim + component)
    }

    /// Component `component` of the value of cell `index`.
    ///
    /// # Errors
    ///
    /// Fails if either index is out of range.
    pub fn value(&self, index: usize, component: usize) -> Result<f64> {
        let i = self.value_index(index, component)?;
        Ok(self.values[i])
    }

    /// Sets component `component` of the value of cell `index`.
    ///
    /// # Errors
    ///
    /// Fails if either index is out of range.
    pub fn set_value(&mut self, index: usize, component: usize, value: f64) -> Result<()> {
        let i = self.value_index(index, component)?;
        self.values[i] = value;
        Ok(())
    }

    /// All `dim` components of cell `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CellOutOfBounds`] if `index >= num_cells()`.
    pub fn values_of(&self, index: usize) -> Result<&[f64]> {
        if index >= self.cells.len() {
            return Err(GridError::CellOutOfBounds {
                index,
                len: self.cells.len(),
            });
        }
        Ok(&self.values[index * self.dim..(index + 1) * self.dim])
    }

    /// Flattened values, `dim * num_cells()` long.
    #[must_use]
    pub fn raw_values(&self) -> &[f64] {
        &self.values
    }

    /// Mutable flattened values. The length cannot be changed through this.
    pub fn raw_values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Replaces all values at once.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ValueCountMismatch`] unless
    /// `values.len() == dim * num_cells()`.
    pub fn set_raw_values(&mut self, values: Vec<f64>) -> Result<()> {
        let expected = self.dim * self.cells.len();
        if values.len() != expected {
            return Err(GridError::value_count_mismatch(expected, values.len()));
        }
        self.values = values;
        Ok(())
    }

    /// Sets every value component to zero.
    pub fn zero_values(&mut self) {
        self.values.fill(0.0);
    }

    /// Removes the cells at `indices` together with their values.
    ///
    /// `indices` must be sorted and free of duplicates. Indices past the end
    /// are ignored and an empty slice is a no-op.
    pub fn erase(&mut self, indices: &[usize]) {
        if indices.is_empty() {
            return;
        }
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        erase_by_indices(&mut self.cells, indices, 1);
        erase_by_indices(&mut self.values, indices, self.dim);
        self.update_bounds();
    }

    /// Cells flagged by an interpolator as non-interpolable.
    #[must_use]
    pub fn bad_cells(&self) -> &[usize] {
        &self.bad_cells
    }

    /// Replaces the bad-cell list.
    pub fn set_bad_cells(&mut self, bad_cells: Vec<usize>) {
        self.bad_cells = bad_cells;
    }

    /// Bounding box of all cells.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Smallest x of the bounding box.
    #[must_use]
    pub const fn min_x(&self) -> f64 {
        self.bounds.min_x
    }

    /// Smallest y of the bounding box.
    #[must_use]
    pub const fn min_y(&self) -> f64 {
        self.bounds.min_y
    }

    /// Largest x of the bounding box.
    #[must_use]
    pub const fn max_x(&self) -> f64 {
        self.bounds.max_x
    }

    /// Largest y of the bounding box.
    #[must_use]
    pub const fn max_y(&self) -> f64 {
        self.bounds.max_y
    }

    fn update_bounds(&mut self) {
        self.bounds = Bounds::of(&self.cells, &self.shape);
    }

    /// Area-weighted sum of one value component over all cells.
    ///
    /// For a pressure grid this is the total normal force.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ComponentOutOfBounds`] if `component >= dim`.
    pub fn integrate(&self, component: usize) -> Result<f64> {
        if component >= self.dim {
            return Err(GridError::ComponentOutOfBounds {
                component,
                dim: self.dim,
            });
        }
        let area = self.shape.area();
        Ok(self
            .values
            .iter()
            .skip(component)
            .step_by(self.dim)
            .map(|v| v * area)
            .sum())
    }
}

/// Removes from `data` every element `k` such that `k / stride` is in
/// `indices`.
///
/// `indices` must be sorted ascending. Out-of-range indices are ignored;
/// an empty slice or a zero stride leaves `data` untouched.
///
/// # Example
///
/// ```
/// use skin_types::erase_by_indices;
///
/// let mut v = vec![0, 0, 0, 1, 1, 1, 2, 2, 2];
/// erase_by_indices(&mut v, &[1], 3);
/// assert_eq!(v, vec![0, 0, 0, 2, 2, 2]);
/// ```
pub fn erase_by_indices<T>(data: &mut Vec<T>, indices: &[usize], stride: usize) {
    if indices.is_empty() || stride == 0 {
        return;
    }
    let mut k = 0usize;
    data.retain(|_| {
        let keep = indices.binary_search(&(k / stride)).is_err();
        k += 1;
        keep
    });
}
