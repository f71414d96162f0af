//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use skin_elastic::{Algorithm, NnlsOptions, Psi};
use skin_interp::Nipp;

/// Reconstruct contact pressures or forces from a recorded skin.
///
/// Reads sensor positions, readings and skin attributes from a YAML file,
/// optionally resamples the readings on a regular grid, solves the inverse
/// elastic problem and dumps every intermediate grid for plotting.
#[derive(Debug, Clone, Parser)]
#[command(name = "skin-reconstruct")]
#[command(version, long_about = None)]
pub struct Cli {
    /// YAML skin description
    #[arg(name = "SKIN")]
    pub input: PathBuf,

    /// Quantity to reconstruct
    #[arg(long, value_enum, default_value_t = Quantity::Pressures)]
    pub quantity: Quantity,

    /// Constrain the reconstruction to non-negative values (NNLS)
    #[arg(long)]
    pub nnls: bool,

    /// Resample the readings on a square grid of this pitch before solving
    #[arg(long, value_name = "METERS")]
    pub source_pitch: Option<f64>,

    /// Pitch of the square reconstruction grid
    #[arg(long, value_name = "METERS", default_value_t = 0.005)]
    pub target_pitch: f64,

    /// Factor converting raw readings into displacements
    #[arg(long, default_value_t = 1.0)]
    pub value_scale: f64,

    /// Handling of resampled cells outside the sensor hull
    #[arg(long, value_enum, default_value_t = NippArg::Zero)]
    pub nipp: NippArg,

    /// Use the thickness-dependent Psi in the Boussinesq model
    #[arg(long)]
    pub exact_psi: bool,

    /// NNLS iteration budget and tolerance
    #[arg(long, value_enum, default_value_t = NnlsPreset::Default)]
    pub nnls_preset: NnlsPreset,

    /// Directory receiving the plot dumps
    #[arg(long, short = 'o', default_value = ".")]
    pub output_dir: PathBuf,

    /// Log at debug level
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Physical quantity to reconstruct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Quantity {
    /// Normal pressures on rectangular cells (Love model)
    Pressures,
    /// Normal point forces (Boussinesq model)
    Forces,
}

/// Non-interpolable point policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NippArg {
    /// Keep the cell with a zero value
    Zero,
    /// Remove the cell from the grid
    Remove,
}

impl From<NippArg> for Nipp {
    fn from(arg: NippArg) -> Self {
        match arg {
            NippArg::Zero => Self::InterpolateToZero,
            NippArg::Remove => Self::RemoveFromGrid,
        }
    }
}

/// Named NNLS option sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NnlsPreset {
    /// Balanced budget and tolerance
    Default,
    /// Large budget, tight tolerance
    Precise,
    /// Small budget, loose tolerance
    Realtime,
}

impl From<NnlsPreset> for NnlsOptions {
    fn from(preset: NnlsPreset) -> Self {
        match preset {
            NnlsPreset::Default => Self::default(),
            NnlsPreset::Precise => Self::precise(),
            NnlsPreset::Realtime => Self::realtime(),
        }
    }
}

impl Cli {
    /// Inverse algorithm: displacements to the requested quantity.
    #[must_use]
    pub const fn inverse_algorithm(&self) -> Algorithm {
        match (self.quantity, self.nnls) {
            (Quantity::Pressures, false) => Algorithm::DisplacementsToPressures,
            (Quantity::Pressures, true) => Algorithm::DisplacementsToNonnegativePressures,
            (Quantity::Forces, false) => Algorithm::DisplacementsToForces,
            (Quantity::Forces, true) => Algorithm::DisplacementsToNonnegativeNormalForces,
        }
    }

    /// Forward algorithm: the requested quantity back to displacements.
    #[must_use]
    pub const fn forward_algorithm(&self) -> Algorithm {
        match self.quantity {
            Quantity::Pressures => Algorithm::PressuresToDisplacements,
            Quantity::Forces => Algorithm::ForcesToDisplacements,
        }
    }

    /// Psi variant selected on the command line.
    #[must_use]
    pub const fn psi(&self) -> Psi {
        if self.exact_psi { Psi::Exact } else { Psi::Constant }
    }
}
