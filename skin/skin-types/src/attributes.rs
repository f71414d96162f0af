//! Physical properties of the elastic skin.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Elastomer properties passed to every elastic model.
///
/// The serialized names follow the sensor description files: `h`, `E`,
/// `nu` and `taxelArea`.
///
/// # Example
///
/// ```
/// use skin_types::SkinAttributes;
///
/// let skin = SkinAttributes::new(0.002, 300_000.0, 0.5, 0.002);
/// assert!(skin.validate().is_ok());
/// assert!(skin.is_incompressible(1e-3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkinAttributes {
    /// Elastomer thickness above the sensors.
    #[cfg_attr(feature = "serde", serde(rename = "h"))]
    pub thickness: f64,

    /// Young's modulus.
    #[cfg_attr(feature = "serde", serde(rename = "E"))]
    pub youngs_modulus: f64,

    /// Poisson ratio.
    #[cfg_attr(feature = "serde", serde(rename = "nu"))]
    pub poisson_ratio: f64,

    /// Sensing area of one taxel.
    #[cfg_attr(feature = "serde", serde(rename = "taxelArea", default))]
    pub taxel_area: f64,
}

impl SkinAttributes {
    /// Creates a new set of attributes.
    #[must_use]
    pub const fn new(thickness: f64, youngs_modulus: f64, poisson_ratio: f64, taxel_area: f64) -> Self {
        Self {
            thickness,
            youngs_modulus,
            poisson_ratio,
            taxel_area,
        }
    }

    /// Returns `true` if the Poisson ratio is within `tol` of 0.5.
    #[must_use]
    pub fn is_incompressible(&self, tol: f64) -> bool {
        crate::geometry::eq_almost(self.poisson_ratio, 0.5, tol)
    }

    /// Checks that the attributes describe a physical material.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.thickness.is_finite() && self.thickness > 0.0) {
            return Err("thickness must be positive");
        }
        if !(self.youngs_modulus.is_finite() && self.youngs_modulus > 0.0) {
            return Err("Young's modulus must be positive");
        }
        if !(self.poisson_ratio > -1.0 && self.poisson_ratio <= 0.5) {
            return Err("Poisson ratio must be in (-1, 0.5]");
        }
        if !(self.taxel_area.is_finite() && self.taxel_area >= 0.0) {
            return Err("taxel area must be non-negative");
        }
        Ok(())
    }
}

impl Default for SkinAttributes {
    /// Incompressible 2 mm elastomer with E = 300 kPa.
    fn default() -> Self {
        Self::new(0.002, 300_000.0, 0.5, 0.0)
    }
}
