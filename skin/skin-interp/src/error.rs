//! Error types for triangulation and interpolation.

use skin_types::GridError;
use thiserror::Error;

/// Errors that can occur while triangulating or interpolating grids.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum InterpError {
    /// Source and target grids carry values of different dimensions.
    #[error("dimension mismatch: source grid has dim {from}, target grid has dim {to}")]
    DimensionMismatch {
        /// Dimension of the source grid.
        from: usize,
        /// Dimension of the target grid.
        to: usize,
    },

    /// The triangulation engine produced an unusable result.
    #[error("triangulation failed: {reason}")]
    Triangulation {
        /// Description of the failure.
        reason: String,
    },

    /// A triangle references a point that does not exist.
    #[error("triangle {triangle} references point {index}, but only {len} points exist")]
    InvalidTriangle {
        /// Position of the triangle in the list.
        triangle: usize,
        /// Offending point index.
        index: usize,
        /// Number of points.
        len: usize,
    },

    /// `interpolate` was called before `offline`.
    #[error("interpolator used before its offline phase")]
    NotPrepared,

    /// The grids no longer match what the offline phase saw.
    #[error("stale interpolation mapping: {what} expected {expected} cells, found {actual}")]
    StaleMapping {
        /// Which grid changed.
        what: &'static str,
        /// Cell count recorded offline.
        expected: usize,
        /// Current cell count.
        actual: usize,
    },

    /// Grid access error.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl InterpError {
    /// Creates a triangulation error.
    pub fn triangulation(reason: impl Into<String>) -> Self {
        Self::Triangulation {
            reason: reason.into(),
        }
    }
}

/// Result type for interpolation operations.
pub type Result<T> = std::result::Result<T, InterpError>;
