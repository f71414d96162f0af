//! Error types for grid operations.

use thiserror::Error;

/// Errors that can occur when building or accessing a [`Grid`](crate::Grid).
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GridError {
    /// Segments cannot be placed on the requested interval.
    #[error("cannot place segments on [{t0}, {t1}] with length {dt}")]
    InvalidSegments {
        /// Start of the interval.
        t0: f64,
        /// End of the interval.
        t1: f64,
        /// Requested segment length.
        dt: f64,
    },

    /// The operation is not implemented for this cell shape.
    #[error("{operation} is not implemented for {shape} cells")]
    NotImplemented {
        /// Operation that was requested.
        operation: &'static str,
        /// Name of the offending shape.
        shape: &'static str,
    },

    /// A cell index is out of range.
    #[error("cell index {index} out of bounds for a grid of {len} cells")]
    CellOutOfBounds {
        /// Requested cell index.
        index: usize,
        /// Number of cells in the grid.
        len: usize,
    },

    /// A value component index is out of range.
    #[error("value component {component} out of bounds for dimension {dim}")]
    ComponentOutOfBounds {
        /// Requested component.
        component: usize,
        /// Dimensionality of the grid's values.
        dim: usize,
    },

    /// A raw value buffer does not match `dim * num_cells`.
    #[error("value buffer size mismatch: expected {expected}, got {actual}")]
    ValueCountMismatch {
        /// Expected number of values.
        expected: usize,
        /// Actual number of values.
        actual: usize,
    },
}

impl GridError {
    /// Creates a value count mismatch error.
    #[must_use]
    pub const fn value_count_mismatch(expected: usize, actual: usize) -> Self {
        Self::ValueCountMismatch { expected, actual }
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
