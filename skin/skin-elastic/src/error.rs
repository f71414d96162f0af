//! Error types for elastic models and reconstruction algorithms.

use skin_types::GridError;
use thiserror::Error;

/// Errors that can occur when building or applying influence matrices.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ElasticError {
    /// A grid carries values of a dimension the model does not handle.
    #[error("{grid} grid has unsupported dimension {dim} (supported: {supported})")]
    UnsupportedDimension {
        /// Role of the grid ("forces", "displacements", ...).
        grid: &'static str,
        /// Actual dimension.
        dim: usize,
        /// Supported dimensions, for the message.
        supported: &'static str,
    },

    /// A 3D grid holds a number of values that is not a multiple of 3.
    #[error("{grid} grid has dimension 3 but {count} values, not divisible by 3")]
    ValueCountNotDivisible {
        /// Role of the grid.
        grid: &'static str,
        /// Number of raw values.
        count: usize,
    },

    /// The model needs a different cell shape.
    #[error("{grid} grid must have rectangular cells, found {shape}")]
    UnsupportedShape {
        /// Role of the grid.
        grid: &'static str,
        /// Name of the offending shape.
        shape: &'static str,
    },

    /// The precomputed payload does not fit the grids it is applied to.
    #[error("precomputed payload is {actual_rows}x{actual_cols}, expected {expected_rows}x{expected_cols}")]
    ShapeMismatch {
        /// Rows implied by the grids.
        expected_rows: usize,
        /// Columns implied by the grids.
        expected_cols: usize,
        /// Rows of the payload.
        actual_rows: usize,
        /// Columns of the payload.
        actual_cols: usize,
    },

    /// The precomputed payload belongs to another kind of algorithm.
    #[error("wrong precomputed payload: expected {expected}, got {actual}")]
    WrongPayload {
        /// Expected payload kind.
        expected: &'static str,
        /// Actual payload kind.
        actual: &'static str,
    },

    /// The pseudoinverse could not be computed.
    #[error("pseudoinverse failed: {0}")]
    PseudoInverse(&'static str),

    /// The non-negative least-squares solver found no solution.
    #[error("NNLS solver failed: {reason}")]
    Solver {
        /// Description of the failure.
        reason: String,
    },

    /// Invalid algorithm parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(&'static str),

    /// Grid access error.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl ElasticError {
    /// Creates an unsupported dimension error.
    #[must_use]
    pub const fn unsupported_dimension(grid: &'static str, dim: usize, supported: &'static str) -> Self {
        Self::UnsupportedDimension {
            grid,
            dim,
            supported,
        }
    }

    /// Creates a solver error.
    pub fn solver(reason: impl Into<String>) -> Self {
        Self::Solver {
            reason: reason.into(),
        }
    }
}

/// Result type for elastic model operations.
pub type Result<T> = std::result::Result<T, ElasticError>;
