//! Moore-Penrose pseudoinverse.

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::{ElasticError, Result};

/// Pseudoinverse of `m` through its singular value decomposition.
///
/// Singular values at or below `max(rows, cols) · σ_max · ε` are treated as
/// zero, so rank-deficient matrices yield the minimum-norm least-squares
/// inverse. An empty matrix inverts to the empty transposed shape.
///
/// # Errors
///
/// Returns [`ElasticError::PseudoInverse`] if the decomposition does not
/// produce both singular vector sets or if `m` has non-finite entries.
#[allow(clippy::cast_precision_loss)]
pub fn pseudo_inverse(m: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let (rows, cols) = m.shape();
    if rows == 0 || cols == 0 {
        return Ok(DMatrix::zeros(cols, rows));
    }
    if m.iter().any(|v| !v.is_finite()) {
        return Err(ElasticError::PseudoInverse("matrix has non-finite entries"));
    }

    let svd = m.clone().svd(true, true);
    let sigma_max = svd.singular_values.max();
    let tol = rows.max(cols) as f64 * sigma_max * f64::EPSILON;
    let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();
    debug!(rows, cols, rank, tol, "Computing pseudoinverse");

    svd.pseudo_inverse(tol).map_err(ElasticError::PseudoInverse)
}
