//! Core data types for tactile skin contact reconstruction.
//!
//! This crate provides the types shared by every stage of the pipeline:
//! - [`Grid`] - cell positions with per-cell values and one [`CellShape`]
//! - [`CellShape`] - rectangle, square or circle cells, with exact area
//! - [`SkinAttributes`] - elastomer thickness, Young's modulus, Poisson ratio
//! - Geometry helpers ([`area_triangle`], [`place_segments`])
//! - A plain-text plot dump ([`dump_for_plot`], [`dump_to_path`])
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no runtime or GUI dependencies. It is used
//! by sensor providers, interpolators, elastic models and command-line tools
//! alike.
//!
//! # Grids
//!
//! A grid is built through one of its named constructors:
//! - [`Grid::from_sensors`] keeps the given positions in order
//! - [`Grid::from_empty`] has no cells
//! - [`Grid::from_fill`] tiles a rectangle with rectangular cells
//!
//! Values are stored flattened, `dim` components per cell, so a grid of
//! normal pressures has `dim = 1` and a grid of 3D displacements `dim = 3`.
//!
//! # Example
//!
//! ```
//! use skin_types::{CellShape, Grid};
//!
//! let natural = Grid::from_sensors(
//!     1,
//!     CellShape::circle(0.2),
//!     [[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]],
//! );
//! let regular = Grid::from_fill(1, CellShape::square(1.0), 0.0, 0.0, 10.0, 10.0).unwrap();
//!
//! assert_eq!(natural.num_cells(), 3);
//! assert_eq!(regular.num_cells(), 100);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod attributes;
mod cell;
mod error;
mod geometry;
mod grid;
mod plot;
mod shape;

pub use attributes::SkinAttributes;
pub use cell::GridCell;
pub use error::{GridError, Result};
pub use geometry::{SegmentPlacement, area_triangle, eq_almost, place_segments};
pub use grid::{Bounds, Grid, erase_by_indices};
pub use plot::{dump_for_plot, dump_to_path};
pub use shape::CellShape;
