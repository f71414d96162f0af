//! Love's solution for uniform pressure on a rectangle.
//!
//! The vertical displacement caused by a unit pressure on a rectangular cell
//! of half extents `a × b`, evaluated at the surface and at depth `h`
//! (Becker & Bevis formulation). The matrix entry for a displacement cell
//! and a pressure cell is `coeff(z = 0) - coeff(z = h)`.

use std::f64::consts::PI;

use nalgebra::DMatrix;
use skin_types::{Grid, SkinAttributes, eq_almost};
use tracing::debug;

use crate::error::{ElasticError, Result};
use crate::pinv::pseudo_inverse;

const EPS: f64 = 1e-8;

/// Corner selector of the closed form; picks the upper or lower sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Corner {
    First,
    Second,
}

impl Corner {
    /// `±`: +1 for the first corner, −1 for the second.
    const fn pm(self) -> f64 {
        match self {
            Self::First => 1.0,
            Self::Second => -1.0,
        }
    }

    /// `∓`: −1 for the first corner, +1 for the second.
    const fn mp(self) -> f64 {
        -self.pm()
    }
}

/// Evaluation point relative to the loaded cell center.
#[derive(Debug, Clone, Copy)]
struct Point {
    x: f64,
    y: f64,
    z: f64,
}

fn rj0(j: Corner, yp: f64, a: f64, p: Point) -> f64 {
    ((a + j.mp() * p.x).powi(2) + (yp - p.y).powi(2) + p.z.powi(2)).sqrt()
}

fn betaj0(j: Corner, a: f64, p: Point) -> f64 {
    ((a + j.mp() * p.x).powi(2) + p.z.powi(2)).sqrt()
}

fn psij0(j: Corner, yp: f64, a: f64, p: Point) -> f64 {
    (yp - p.y) / (rj0(j, yp, a, p) + betaj0(j, a, p))
}

/// `coeff · ln(arg)`, or zero when `coeff` vanishes.
fn safe_log(coeff: f64, arg: f64) -> f64 {
    if eq_almost(coeff, 0.0, EPS) {
        0.0
    } else {
        coeff * arg.ln()
    }
}

fn lj(j: Corner, yp: f64, a: f64, p: Point) -> f64 {
    let deltay = yp - p.y;
    let edge = j.pm() * a - p.x;
    let psi = psij0(j, yp, a, p);

    let mut ret = safe_log(deltay, edge + rj0(j, yp, a, p)) - deltay
        + safe_log(edge, (1.0 + psi) / (1.0 - psi));

    if !eq_almost(p.z, 0.0, EPS) {
        let on_edge = match j {
            Corner::First => eq_almost(p.x, a, EPS),
            Corner::Second => eq_almost(p.x, -a, EPS),
        };
        let atan_arg = if on_edge {
            psi
        } else {
            p.z * psi / (edge + betaj0(j, a, p))
        };
        ret += 2.0 * p.z * atan_arg.atan();
    }
    ret
}

/// Displacement at `(x, y, z)` per unit pressure on a rectangle of half
/// extents `a × b` centered at the origin.
#[must_use]
pub fn love_coeff(a: f64, b: f64, e: f64, nu: f64, x: f64, y: f64, z: f64) -> f64 {
    use Corner::{First, Second};
    let p = Point { x, y, z };

    let mut ret = ((1.0 - nu * nu) / (PI * e))
        * ((lj(First, b, a, p) - lj(Second, b, a, p)) - (lj(First, -b, a, p) - lj(Second, -b, a, p)));

    if !eq_almost(z, 0.0, EPS) {
        ret += (z * (1.0 + nu) / (2.0 * PI * e))
            * (((a - x) * (b - y) / (z * rj0(First, b, a, p))).atan()
                + ((a + x) * (b - y) / (z * rj0(Second, b, a, p))).atan()
                - (((a - x) * (-b - y) / (z * rj0(First, -b, a, p))).atan()
                    + ((a + x) * (-b - y) / (z * rj0(Second, -b, a, p))).atan()));
    }
    ret
}

pub(crate) fn check_grids(pressures: &Grid, displacements: &Grid) -> Result<()> {
    if !pressures.shape().is_rectangular() {
        return Err(ElasticError::UnsupportedShape {
            grid: "pressures",
            shape: pressures.shape().name(),
        });
    }
    if pressures.dim() != 1 {
        return Err(ElasticError::unsupported_dimension("pressures", pressures.dim(), "1"));
    }
    if displacements.dim() != 1 {
        return Err(ElasticError::unsupported_dimension(
            "displacements",
            displacements.dim(),
            "1",
        ));
    }
    Ok(())
}

/// Matrix mapping the normal pressures of `p` onto the normal displacements
/// of `d`.
///
/// # Errors
///
/// Fails unless `p` has rectangular cells and both grids are 1D.
pub fn pressures_to_displacements_matrix(
    p: &Grid,
    d: &Grid,
    skin: &SkinAttributes,
) -> Result<DMatrix<f64>> {
    check_grids(p, d)?;

    let a = 0.5 * p.shape().dx();
    let b = 0.5 * p.shape().dy();
    let e = skin.youngs_modulus;
    let nu = skin.poisson_ratio;
    let h = skin.thickness;

    let m = DMatrix::from_fn(d.num_cells(), p.num_cells(), |id, ip| {
        let dc = d.cells()[id];
        let pc = p.cells()[ip];
        let x = dc.x - pc.x;
        let y = dc.y - pc.y;
        love_coeff(a, b, e, nu, x, y, 0.0) - love_coeff(a, b, e, nu, x, y, h)
    });

    debug!(
        rows = m.nrows(),
        cols = m.ncols(),
        "Built pressures-to-displacements matrix"
    );
    Ok(m)
}

/// Pseudoinverse of [`pressures_to_displacements_matrix`].
///
/// # Errors
///
/// Fails like [`pressures_to_displacements_matrix`], or if the
/// pseudoinverse cannot be computed.
pub fn displacements_to_pressures_matrix(
    d: &Grid,
    p: &Grid,
    skin: &SkinAttributes,
) -> Result<DMatrix<f64>> {
    let forward = pressures_to_displacements_matrix(p, d, skin)?;
    pseudo_inverse(&forward)
}
