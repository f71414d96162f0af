//! Elastic models and contact reconstruction for tactile skins.
//!
//! A tactile skin is a thin elastomer layer over a rigid base. Loads on its
//! surface deform it, and sensors embedded at depth `h` measure the
//! resulting displacements. This crate relates the two linearly:
//!
//! - [`forces_to_displacements_matrix`] - Boussinesq-Cerruti point forces
//!   on an incompressible half-space, 1D (normal) or 3D
//! - [`pressures_to_displacements_matrix`] - Love's uniform pressure on
//!   rectangular cells, normal only
//! - [`pseudo_inverse`] - least-squares inverse of either model
//! - [`NnlsSolver`] - non-negative least squares, for reconstructions where
//!   only compressive loads are physical
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no runtime or GUI dependencies. Everything
//! is synchronous and single-threaded.
//!
//! # Algorithms
//!
//! The models are wrapped into six [`ContactAlgorithm`]s with an expensive
//! offline phase (build the matrix or the solver) and a cheap online phase
//! (apply it to new values). [`Algorithm`] selects one at run time and
//! carries its payload as a [`Precomputed`].
//!
//! | Algorithm | Model | Online phase |
//! |-----------|-------|--------------|
//! | [`ForcesToDisplacements`] | Boussinesq | matrix product |
//! | [`DisplacementsToForces`] | Boussinesq | pseudoinverse product |
//! | [`PressuresToDisplacements`] | Love | matrix product |
//! | [`DisplacementsToPressures`] | Love | pseudoinverse product |
//! | [`DisplacementsToNonnegativeNormalForces`] | Boussinesq | NNLS |
//! | [`DisplacementsToNonnegativePressures`] | Love | NNLS |
//!
//! # Example
//!
//! ```
//! use skin_elastic::{Algorithm, AlgorithmParams};
//! use skin_types::{CellShape, Grid, SkinAttributes};
//!
//! let params = AlgorithmParams::new(SkinAttributes::new(0.002, 300_000.0, 0.5, 0.0));
//! let mut forces = Grid::from_fill(1, CellShape::square(1.0), 0.0, 0.0, 3.0, 3.0).unwrap();
//! let mut displacements = Grid::from_sensors(1, CellShape::square(1.0), forces.cells().to_vec());
//!
//! let forward = Algorithm::ForcesToDisplacements;
//! let pre = forward.offline(&forces, &displacements, &params).unwrap();
//!
//! forces.set_value(4, 0, 1.0).unwrap();
//! forward.run(&pre, &forces, &mut displacements).unwrap();
//! assert!(displacements.value(4, 0).unwrap() > 0.0);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod algorithm;
mod boussinesq;
mod config;
mod error;
mod love;
mod nnls;
mod pinv;

pub use algorithm::{
    Algorithm, ContactAlgorithm, DisplacementsToForces, DisplacementsToNonnegativeNormalForces,
    DisplacementsToNonnegativePressures, DisplacementsToPressures, ForcesToDisplacements, NnlsHandle,
    Precomputed, PressuresToDisplacements,
};
pub use boussinesq::{
    BoussinesqKernel, Influence, displacements_to_forces_matrix, forces_to_displacements_matrix,
};
pub use config::{AlgorithmParams, BoussinesqOptions, NnlsOptions, Psi};
pub use error::{ElasticError, Result};
pub use love::{displacements_to_pressures_matrix, love_coeff, pressures_to_displacements_matrix};
pub use nnls::{NnlsSolution, NnlsSolver};
pub use pinv::pseudo_inverse;
