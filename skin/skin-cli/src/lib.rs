//! Contact reconstruction from the command line.
//!
//! The `skin-reconstruct` binary chains the workspace crates:
//!
//! 1. [`skin_provider`] loads sensor positions and readings
//! 2. [`skin_interp`] optionally resamples them on a regular grid
//! 3. [`skin_elastic`] solves for pressures or normal forces and maps them
//!    back onto displacements
//! 4. [`skin_types`] dumps every grid in the plot text format
//!
//! The pipeline is exposed as a library so it can be driven from tests.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cli;
mod pipeline;

pub use cli::{Cli, NippArg, NnlsPreset, Quantity};
pub use pipeline::{Report, run};
