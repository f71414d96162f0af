//! Offline/online reconstruction algorithms.
//!
//! Every algorithm splits into an expensive `offline` phase that depends only
//! on the grid geometries and the skin parameters, and a cheap `run` phase
//! applied to every new set of values.
//!
//! Each concrete algorithm implements [`ContactAlgorithm`] with its own
//! payload type. [`Algorithm`] and [`Precomputed`] wrap them in closed enums
//! for callers that pick the algorithm at run time.

use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use skin_types::Grid;
use tracing::debug;

use crate::boussinesq::{self, displacements_to_forces_matrix, forces_to_displacements_matrix};
use crate::config::{AlgorithmParams, NnlsOptions};
use crate::error::{ElasticError, Result};
use crate::love::{self, displacements_to_pressures_matrix, pressures_to_displacements_matrix};
use crate::nnls::NnlsSolver;

/// The offline/online contract shared by all algorithms.
pub trait ContactAlgorithm {
    /// Result of the offline phase, consumed by every `run`.
    type Precomputed;

    /// Builds the payload mapping `input` values onto `output` values.
    ///
    /// # Errors
    ///
    /// Fails if the grids or `params` are unsuitable for the model.
    fn offline(&self, input: &Grid, output: &Grid, params: &AlgorithmParams) -> Result<Self::Precomputed>;

    /// Computes `output` values from `input` values.
    ///
    /// Replaces every value of `output`; its cells are left untouched.
    ///
    /// # Errors
    ///
    /// Fails if the grids no longer match the payload.
    fn run(&self, precomputed: &Self::Precomputed, input: &Grid, output: &mut Grid) -> Result<()>;
}

/// Shared NNLS solver together with the options to solve with.
#[derive(Debug, Clone)]
pub struct NnlsHandle {
    /// Solver bound to the forward influence matrix.
    pub solver: Arc<NnlsSolver>,
    /// Options used by every solve.
    pub options: NnlsOptions,
}

fn validate_params(params: &AlgorithmParams) -> Result<()> {
    params.validate().map_err(ElasticError::InvalidParams)
}

fn check_payload_shape(rows: usize, cols: usize, output: &Grid, input: &Grid) -> Result<()> {
    let expected_rows = output.raw_values().len();
    let expected_cols = input.raw_values().len();
    if (rows, cols) != (expected_rows, expected_cols) {
        return Err(ElasticError::ShapeMismatch {
            expected_rows,
            expected_cols,
            actual_rows: rows,
            actual_cols: cols,
        });
    }
    Ok(())
}

fn apply_dense(m: &DMatrix<f64>, input: &Grid, output: &mut Grid) -> Result<()> {
    check_payload_shape(m.nrows(), m.ncols(), output, input)?;
    let values = m * DVector::from_column_slice(input.raw_values());
    output.set_raw_values(values.iter().copied().collect())?;
    Ok(())
}

fn solve_nnls(handle: &NnlsHandle, input: &Grid, output: &mut Grid) -> Result<()> {
    // The solver matrix maps output values onto input values.
    check_payload_shape(handle.solver.ncols(), handle.solver.nrows(), output, input)?;
    let solution = handle.solver.solve_slice(input.raw_values(), &handle.options)?;
    debug!(
        unknowns = solution.x.len(),
        residual_norm = solution.residual_norm,
        "Solved non-negative reconstruction"
    );
    output.set_raw_values(solution.x.iter().copied().collect())?;
    Ok(())
}

fn require_normal(grid: &Grid, name: &'static str) -> Result<()> {
    if grid.dim() == 1 {
        Ok(())
    } else {
        Err(ElasticError::unsupported_dimension(name, grid.dim(), "1"))
    }
}

/// Boussinesq forward model: forces (input) to displacements (output).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForcesToDisplacements;

impl ContactAlgorithm for ForcesToDisplacements {
    type Precomputed = DMatrix<f64>;

    fn offline(&self, input: &Grid, output: &Grid, params: &AlgorithmParams) -> Result<DMatrix<f64>> {
        validate_params(params)?;
        forces_to_displacements_matrix(input, output, &params.skin, &params.boussinesq)
    }

    fn run(&self, precomputed: &DMatrix<f64>, input: &Grid, output: &mut Grid) -> Result<()> {
        boussinesq::check_grids(input, output)?;
        apply_dense(precomputed, input, output)
    }
}

/// Boussinesq least-squares inverse: displacements (input) to forces (output).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplacementsToForces;

impl ContactAlgorithm for DisplacementsToForces {
    type Precomputed = DMatrix<f64>;

    fn offline(&self, input: &Grid, output: &Grid, params: &AlgorithmParams) -> Result<DMatrix<f64>> {
        validate_params(params)?;
        displacements_to_forces_matrix(input, output, &params.skin, &params.boussinesq)
    }

    fn run(&self, precomputed: &DMatrix<f64>, input: &Grid, output: &mut Grid) -> Result<()> {
        boussinesq::check_grids(output, input)?;
        apply_dense(precomputed, input, output)
    }
}

/// Love forward model: pressures (input) to displacements (output).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressuresToDisplacements;

impl ContactAlgorithm for PressuresToDisplacements {
    type Precomputed = DMatrix<f64>;

    fn offline(&self, input: &Grid, output: &Grid, params: &AlgorithmParams) -> Result<DMatrix<f64>> {
        validate_params(params)?;
        pressures_to_displacements_matrix(input, output, &params.skin)
    }

    fn run(&self, precomputed: &DMatrix<f64>, input: &Grid, output: &mut Grid) -> Result<()> {
        love::check_grids(input, output)?;
        apply_dense(precomputed, input, output)
    }
}

/// Love least-squares inverse: displacements (input) to pressures (output).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplacementsToPressures;

impl ContactAlgorithm for DisplacementsToPressures {
    type Precomputed = DMatrix<f64>;

    fn offline(&self, input: &Grid, output: &Grid, params: &AlgorithmParams) -> Result<DMatrix<f64>> {
        validate_params(params)?;
        displacements_to_pressures_matrix(input, output, &params.skin)
    }

    fn run(&self, precomputed: &DMatrix<f64>, input: &Grid, output: &mut Grid) -> Result<()> {
        love::check_grids(output, input)?;
        apply_dense(precomputed, input, output)
    }
}

/// Non-negative normal forces from displacements, through the Boussinesq
/// model.
///
/// Displacements may be 1D or 3D; forces must be 1D.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplacementsToNonnegativeNormalForces;

impl DisplacementsToNonnegativeNormalForces {
    fn check(input: &Grid, output: &Grid) -> Result<()> {
        boussinesq::check_grids(output, input)?;
        require_normal(output, "forces")
    }
}

impl ContactAlgorithm for DisplacementsToNonnegativeNormalForces {
    type Precomputed = NnlsHandle;

    fn offline(&self, input: &Grid, output: &Grid, params: &AlgorithmParams) -> Result<NnlsHandle> {
        validate_params(params)?;
        Self::check(input, output)?;
        let forward = forces_to_displacements_matrix(output, input, &params.skin, &params.boussinesq)?;
        Ok(NnlsHandle {
            solver: Arc::new(NnlsSolver::from_dense(&forward)?),
            options: params.nnls,
        })
    }

    fn run(&self, precomputed: &NnlsHandle, input: &Grid, output: &mut Grid) -> Result<()> {
        Self::check(input, output)?;
        solve_nnls(precomputed, input, output)
    }
}

/// Non-negative pressures from displacements, through the Love model.
///
/// Both grids must be 1D and the pressures grid rectangular.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplacementsToNonnegativePressures;

impl ContactAlgorithm for DisplacementsToNonnegativePressures {
    type Precomputed = NnlsHandle;

    fn offline(&self, input: &Grid, output: &Grid, params: &AlgorithmParams) -> Result<NnlsHandle> {
        validate_params(params)?;
        let forward = pressures_to_displacements_matrix(output, input, &params.skin)?;
        Ok(NnlsHandle {
            solver: Arc::new(NnlsSolver::from_dense(&forward)?),
            options: params.nnls,
        })
    }

    fn run(&self, precomputed: &NnlsHandle, input: &Grid, output: &mut Grid) -> Result<()> {
        love::check_grids(output, input)?;
        solve_nnls(precomputed, input, output)
    }
}

/// Payload of any algorithm's offline phase.
#[derive(Debug, Clone)]
pub enum Precomputed {
    /// Influence matrix or its pseudoinverse.
    Dense(DMatrix<f64>),
    /// Shared NNLS solver.
    Nnls(NnlsHandle),
}

impl Precomputed {
    /// Name of the variant, used in messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Dense(_) => "dense matrix",
            Self::Nnls(_) => "NNLS solver",
        }
    }

    /// The dense matrix, if this is one.
    #[must_use]
    pub const fn as_dense(&self) -> Option<&DMatrix<f64>> {
        match self {
            Self::Dense(m) => Some(m),
            Self::Nnls(_) => None,
        }
    }

    /// The NNLS handle, if this is one.
    #[must_use]
    pub const fn as_nnls(&self) -> Option<&NnlsHandle> {
        match self {
            Self::Nnls(h) => Some(h),
            Self::Dense(_) => None,
        }
    }

    fn dense(&self) -> Result<&DMatrix<f64>> {
        self.as_dense().ok_or(ElasticError::WrongPayload {
            expected: "dense matrix",
            actual: self.kind(),
        })
    }

    fn nnls(&self) -> Result<&NnlsHandle> {
        self.as_nnls().ok_or(ElasticError::WrongPayload {
            expected: "NNLS solver",
            actual: self.kind(),
        })
    }
}

impl From<DMatrix<f64>> for Precomputed {
    fn from(m: DMatrix<f64>) -> Self {
        Self::Dense(m)
    }
}

impl From<NnlsHandle> for Precomputed {
    fn from(h: NnlsHandle) -> Self {
        Self::Nnls(h)
    }
}

/// Every available algorithm, selectable at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    /// See [`ForcesToDisplacements`].
    ForcesToDisplacements,
    /// See [`DisplacementsToForces`].
    DisplacementsToForces,
    /// See [`PressuresToDisplacements`].
    PressuresToDisplacements,
    /// See [`DisplacementsToPressures`].
    DisplacementsToPressures,
    /// See [`DisplacementsToNonnegativeNormalForces`].
    DisplacementsToNonnegativeNormalForces,
    /// See [`DisplacementsToNonnegativePressures`].
    DisplacementsToNonnegativePressures,
}

impl Algorithm {
    /// All algorithms.
    pub const ALL: [Self; 6] = [
        Self::ForcesToDisplacements,
        Self::DisplacementsToForces,
        Self::PressuresToDisplacements,
        Self::DisplacementsToPressures,
        Self::DisplacementsToNonnegativeNormalForces,
        Self::DisplacementsToNonnegativePressures,
    ];

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ForcesToDisplacements => "forces to displacements",
            Self::DisplacementsToForces => "displacements to forces",
            Self::PressuresToDisplacements => "pressures to displacements",
            Self::DisplacementsToPressures => "displacements to pressures",
            Self::DisplacementsToNonnegativeNormalForces => "displacements to non-negative normal forces",
            Self::DisplacementsToNonnegativePressures => "displacements to non-negative pressures",
        }
    }

    /// Whether the online phase solves an NNLS problem.
    #[must_use]
    pub const fn is_nonnegative(self) -> bool {
        matches!(
            self,
            Self::DisplacementsToNonnegativeNormalForces | Self::DisplacementsToNonnegativePressures
        )
    }

    /// Runs the offline phase of the selected algorithm.
    ///
    /// # Errors
    ///
    /// Same as the concrete algorithm's [`ContactAlgorithm::offline`].
    pub fn offline(self, input: &Grid, output: &Grid, params: &AlgorithmParams) -> Result<Precomputed> {
        debug!(
            algorithm = self.name(),
            inputs = input.raw_values().len(),
            outputs = output.raw_values().len(),
            "Offline phase"
        );
        Ok(match self {
            Self::ForcesToDisplacements => ForcesToDisplacements.offline(input, output, params)?.into(),
            Self::DisplacementsToForces => DisplacementsToForces.offline(input, output, params)?.into(),
            Self::PressuresToDisplacements => PressuresToDisplacements.offline(input, output, params)?.into(),
            Self::DisplacementsToPressures => DisplacementsToPressures.offline(input, output, params)?.into(),
            Self::DisplacementsToNonnegativeNormalForces => {
                DisplacementsToNonnegativeNormalForces.offline(input, output, params)?.into()
            }
            Self::DisplacementsToNonnegativePressures => {
                DisplacementsToNonnegativePressures.offline(input, output, params)?.into()
            }
        })
    }

    /// Runs the online phase of the selected algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`ElasticError::WrongPayload`] if `precomputed` was produced
    /// by an algorithm of the other family, otherwise fails like the
    /// concrete algorithm's [`ContactAlgorithm::run`].
    pub fn run(self, precomputed: &Precomputed, input: &Grid, output: &mut Grid) -> Result<()> {
        match self {
            Self::ForcesToDisplacements => ForcesToDisplacements.run(precomputed.dense()?, input, output),
            Self::DisplacementsToForces => DisplacementsToForces.run(precomputed.dense()?, input, output),
            Self::PressuresToDisplacements => PressuresToDisplacements.run(precomputed.dense()?, input, output),
            Self::DisplacementsToPressures => DisplacementsToPressures.run(precomputed.dense()?, input, output),
            Self::DisplacementsToNonnegativeNormalForces => {
                DisplacementsToNonnegativeNormalForces.run(precomputed.nnls()?, input, output)
            }
            Self::DisplacementsToNonnegativePressures => {
                DisplacementsToNonnegativePressures.run(precomputed.nnls()?, input, output)
            }
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
