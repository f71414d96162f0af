//! Delaunay-based interpolation between skin grids.
//!
//! Sensor positions on a skin are irregular. This crate resamples their
//! readings onto any other [`Grid`](skin_types::Grid), typically a regular
//! one built with [`Grid::from_fill`](skin_types::Grid::from_fill):
//!
//! - [`Delaunay`] triangulates the source cell centers (through Shewchuk's
//!   Triangle) and locates query points with barycentric coordinates
//! - [`LinearDelaunayInterpolator`] implements the two-phase
//!   [`Interpolator`] contract on top of it
//!
//! # Phases
//!
//! The offline phase triangulates the source grid and records, for every
//! target cell, the containing triangle and its barycentric weights. Target
//! cells outside the triangulation are handled according to [`Nipp`]. The
//! online phase is a weighted sum per target cell and value component.
//!
//! The mappings are owned by the interpolator, not by the grids. Changing the
//! cell count of either grid after the offline phase is reported as
//! [`InterpError::StaleMapping`]; moving cells without changing their count
//! is not detected.
//!
//! # Example
//!
//! ```
//! use skin_interp::{Interpolator, LinearDelaunayInterpolator, Nipp};
//! use skin_types::{CellShape, Grid};
//!
//! let mut natural = Grid::from_sensors(
//!     1,
//!     CellShape::circle(0.5),
//!     [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]],
//! );
//! natural.set_raw_values(vec![1.0, 1.0, 1.0, 1.0]).unwrap();
//!
//! let mut regular = Grid::from_fill_bounds(1, CellShape::square(1.0), &natural).unwrap();
//! let mut interp = LinearDelaunayInterpolator::new(Nipp::InterpolateToZero);
//! interp.offline(&natural, &mut regular).unwrap();
//! interp.interpolate(&natural, &mut regular).unwrap();
//!
//! // Cells inside the hull see the constant field.
//! for (i, cell) in regular.cells().iter().enumerate() {
//!     if !regular.bad_cells().contains(&i) {
//!         assert!((regular.value(i, 0).unwrap() - 1.0).abs() < 1e-9, "{cell:?}");
//!     }
//! }
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod delaunay;
mod error;
mod interpolator;

pub use delaunay::{Delaunay, LOCATE_EPS, TriangleLocation};
pub use error::{InterpError, Result};
pub use interpolator::{Interpolator, LinearDelaunayInterpolator, Nipp, TargetCellMapping};
