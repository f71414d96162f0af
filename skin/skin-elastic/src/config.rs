//! Tuning parameters for the elastic models and the NNLS solver.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use skin_types::SkinAttributes;

/// Value of Ψ used by the Boussinesq same-point approximation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Psi {
    /// Ψ = 0.25.
    #[default]
    Constant,
    /// Ψ(v) = (0.2431 v − 0.1814) / v with v = h / z0h.
    Exact,
}

impl Psi {
    /// Evaluates Ψ for thickness `h` and characteristic depth `z0h`.
    #[must_use]
    pub fn evaluate(self, h: f64, z0h: f64) -> f64 {
        match self {
            Self::Constant => 0.25,
            Self::Exact => {
                let v = h / z0h;
                (0.2431 * v - 0.1814) / v
            }
        }
    }
}

/// Options for the Boussinesq point-force model.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoussinesqOptions {
    /// How Ψ is computed for the same-point approximation.
    pub psi: Psi,
}

/// Options for the non-negative least-squares solver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NnlsOptions {
    /// Iteration budget as a multiple of the number of unknowns.
    pub max_iterations_factor: usize,

    /// Relative tolerance on the gradient used as the optimality test.
    ///
    /// Scaled by the largest entry of `Aᵀb`.
    pub tolerance: f64,
}

impl Default for NnlsOptions {
    fn default() -> Self {
        Self {
            max_iterations_factor: 3,
            tolerance: 1e-10,
        }
    }
}

impl NnlsOptions {
    /// Generous budget and tight tolerance, for offline analysis.
    #[must_use]
    pub fn precise() -> Self {
        Self {
            max_iterations_factor: 10,
            tolerance: 1e-13,
        }
    }

    /// Small budget, for online use at sensor rate.
    #[must_use]
    pub fn realtime() -> Self {
        Self {
            max_iterations_factor: 2,
            tolerance: 1e-8,
        }
    }

    /// Iteration budget for `unknowns` unknowns.
    #[must_use]
    pub fn max_iterations(&self, unknowns: usize) -> usize {
        self.max_iterations_factor.saturating_mul(unknowns.max(1))
    }

    /// Validate the options.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_iterations_factor == 0 {
            return Err("max_iterations_factor must be at least 1");
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err("tolerance must be finite and non-negative");
        }
        Ok(())
    }
}

/// Everything an algorithm's offline phase needs besides the grids.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlgorithmParams {
    /// Physical properties of the skin.
    pub skin: SkinAttributes,
    /// Boussinesq model options.
    pub boussinesq: BoussinesqOptions,
    /// NNLS solver options.
    pub nnls: NnlsOptions,
}

impl AlgorithmParams {
    /// Parameters for `skin` with default options.
    #[must_use]
    pub fn new(skin: SkinAttributes) -> Self {
        Self {
            skin,
            ..Self::default()
        }
    }

    /// Sets the Boussinesq options.
    #[must_use]
    pub const fn with_boussinesq(mut self, boussinesq: BoussinesqOptions) -> Self {
        self.boussinesq = boussinesq;
        self
    }

    /// Sets the NNLS options.
    #[must_use]
    pub const fn with_nnls(mut self, nnls: NnlsOptions) -> Self {
        self.nnls = nnls;
        self
    }

    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), &'static str> {
        self.skin.validate()?;
        self.nnls.validate()
    }
}
