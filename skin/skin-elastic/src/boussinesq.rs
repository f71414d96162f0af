//! Boussinesq-Cerruti point-force model.
//!
//! Influence coefficients of a point force applied on the surface of an
//! incompressible half-space, measured at depth `h` (the skin thickness)
//! relative to the rigid base. The matrix maps the forces grid's raw values
//! (columns) onto the displacements grid's raw values (rows).
//!
//! # Same-point approximation
//!
//! The closed form is singular when a force and a displacement share a
//! location. For each (displacement, force) cell pair the approximation
//! `9 Ψ / (2πE z0h)` replaces the exact `zz` coefficient when the offset is
//! exactly zero or when its magnitude is smaller than the exact one. In that
//! regime the in-plane diagonal becomes `9 Ψ / (4πE z0h)` and the cross
//! terms vanish. `z0h = sqrt(3 ΔS / 2π)` where `ΔS` is the force cell area.
//!
//! The equations assume `ν = 0.5`; other values only log a warning.

use std::f64::consts::PI;

use nalgebra::DMatrix;
use skin_types::{Grid, SkinAttributes};
use tracing::{debug, warn};

use crate::config::BoussinesqOptions;
use crate::error::{ElasticError, Result};
use crate::pinv::pseudo_inverse;

/// Influence coefficients for one (displacement, force) pair.
///
/// The tensor is symmetric, so only the upper triangle is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Influence {
    /// x displacement per x force.
    pub xx: f64,
    /// x displacement per y force, equal to `yx`.
    pub xy: f64,
    /// x displacement per z force, equal to `zx`.
    pub xz: f64,
    /// y displacement per y force.
    pub yy: f64,
    /// y displacement per z force, equal to `zy`.
    pub yz: f64,
    /// z displacement per z force.
    pub zz: f64,
}

impl Influence {
    /// Coefficient for displacement component `row` and force component `col`.
    ///
    /// Components are numbered x = 0, y = 1, z = 2.
    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> f64 {
        match (row, col) {
            (0, 0) => self.xx,
            (0, 1) | (1, 0) => self.xy,
            (0, 2) | (2, 0) => self.xz,
            (1, 1) => self.yy,
            (1, 2) | (2, 1) => self.yz,
            _ => self.zz,
        }
    }
}

/// Precomputed constants shared by every pair of a matrix.
#[derive(Debug, Clone, Copy)]
pub struct BoussinesqKernel {
    h: f64,
    c_other: f64,
    appro_xy: f64,
    appro_z: f64,
}

impl BoussinesqKernel {
    /// Kernel for `skin` and force cells of area `force_cell_area`.
    #[must_use]
    pub fn new(skin: &SkinAttributes, force_cell_area: f64, options: &BoussinesqOptions) -> Self {
        let e = skin.youngs_modulus;
        let h = skin.thickness;
        let z0h = (force_cell_area * 3.0 / (2.0 * PI)).sqrt();
        let psi = options.psi.evaluate(h, z0h);
        Self {
            h,
            c_other: 3.0 / (4.0 * PI * e),
            appro_xy: 9.0 / (4.0 * PI * e) * psi / z0h,
            appro_z: 9.0 / (2.0 * PI * e) * psi / z0h,
        }
    }

    /// Same-point approximation coefficients.
    #[must_use]
    pub const fn approximation(&self) -> Influence {
        Influence {
            xx: self.appro_xy,
            xy: 0.0,
            xz: 0.0,
            yy: self.appro_xy,
            yz: 0.0,
            zz: self.appro_z,
        }
    }

    /// Coefficients for a displacement at offset `(dx, dy)` from the force.
    #[must_use]
    pub fn influence(&self, dx: f64, dy: f64) -> Influence {
        if dx == 0.0 && dy == 0.0 {
            return self.approximation();
        }

        let c = self.c_other;
        let h2 = self.h * self.h;
        let dx2 = dx * dx;
        let dy2 = dy * dy;
        let r2 = dx2 + dy2;
        let r = r2.sqrt();
        let inv_r3 = 1.0 / (r2 * r);
        let rh2 = r2 + h2;
        let inv_rh3 = 1.0 / (rh2 * rh2.sqrt());

        let zz = c * (1.0 / r - (r2 + 2.0 * h2) * inv_rh3);
        if self.appro_z.abs() < zz.abs() {
            return self.approximation();
        }

        Influence {
            xx: c * ((2.0 * dx2 + dy2) * inv_r3 - (2.0 * dx2 + dy2 + h2) * inv_rh3),
            xy: c * (dx * dy * inv_r3 - dx * dy * inv_rh3),
            xz: -c * dx * self.h * inv_rh3,
            yy: c * ((dx2 + 2.0 * dy2) * inv_r3 - (dx2 + 2.0 * dy2 + h2) * inv_rh3),
            yz: -c * dy * self.h * inv_rh3,
            zz,
        }
    }
}

pub(crate) fn check_grids(forces: &Grid, displacements: &Grid) -> Result<()> {
    for (name, grid) in [("forces", forces), ("displacements", displacements)] {
        match grid.dim() {
            1 => {}
            3 if grid.raw_values().len() % 3 == 0 => {}
            3 => {
                return Err(ElasticError::ValueCountNotDivisible {
                    grid: name,
                    count: grid.raw_values().len(),
                });
            }
            dim => return Err(ElasticError::unsupported_dimension(name, dim, "1 or 3")),
        }
    }
    Ok(())
}

/// Matrix mapping the forces of `f` onto the displacements of `d`.
///
/// Rows follow `d.raw_values()`, columns follow `f.raw_values()`. For a 1D
/// grid the single component is the normal (z) one.
///
/// # Errors
///
/// Fails if either grid has a dimension other than 1 or 3.
///
/// # Example
///
/// ```
/// use skin_elastic::{BoussinesqOptions, forces_to_displacements_matrix};
/// use skin_types::{CellShape, Grid, SkinAttributes};
///
/// let f = Grid::from_sensors(1, CellShape::square(0.01), [[0.0, 0.0], [0.01, 0.0]]);
/// let d = Grid::from_sensors(3, CellShape::square(0.01), [[0.0, 0.0]]);
/// let skin = SkinAttributes::new(0.002, 300_000.0, 0.5, 0.0);
///
/// let m = forces_to_displacements_matrix(&f, &d, &skin, &BoussinesqOptions::default()).unwrap();
/// assert_eq!(m.shape(), (3, 2));
/// ```
pub fn forces_to_displacements_matrix(
    f: &Grid,
    d: &Grid,
    skin: &SkinAttributes,
    options: &BoussinesqOptions,
) -> Result<DMatrix<f64>> {
    if !skin.is_incompressible(1e-3) {
        warn!(
            nu = skin.poisson_ratio,
            "Forces-to-displacements equations are only valid for nu = 0.5"
        );
    }
    check_grids(f, d)?;

    let f_stride = f.dim();
    let d_stride = d.dim();
    let nrows = d.num_cells() * d_stride;
    let ncols = f.num_cells() * f_stride;
    let kernel = BoussinesqKernel::new(skin, f.shape().area(), options);

    // Components written for each stride: 1D grids only carry z.
    let components = |stride: usize| -> &'static [usize] {
        if stride == 1 { &[2] } else { &[0, 1, 2] }
    };
    let d_components = components(d_stride);
    let f_components = components(f_stride);

    let mut m = DMatrix::zeros(nrows, ncols);
    for (nj, fc) in f.cells().iter().enumerate() {
        for (ni, dc) in d.cells().iter().enumerate() {
            let k = kernel.influence(dc.x - fc.x, dc.y - fc.y);
            for (ri, &row) in d_components.iter().enumerate() {
                for (ci, &col) in f_components.iter().enumerate() {
                    m[(ni * d_stride + ri, nj * f_stride + ci)] = k.get(row, col);
                }
            }
        }
    }

    debug!(rows = nrows, cols = ncols, "Built forces-to-displacements matrix");
    Ok(m)
}

/// Pseudoinverse of [`forces_to_displacements_matrix`]: maps the
/// displacements of `d` onto the least-squares forces of `f`.
///
/// # Errors
///
/// Fails like [`forces_to_displacements_matrix`], or if the pseudoinverse
/// cannot be computed.
pub fn displacements_to_forces_matrix(
    d: &Grid,
    f: &Grid,
    skin: &SkinAttributes,
    options: &BoussinesqOptions,
) -> Result<DMatrix<f64>> {
    let forward = forces_to_displacements_matrix(f, d, skin, options)?;
    pseudo_inverse(&forward)
}
