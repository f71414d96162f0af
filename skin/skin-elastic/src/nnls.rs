//! Non-negative least squares.
//!
//! Solves `min ‖A x − b‖₂` subject to `x ≥ 0` with the Lawson-Hanson active
//! set method. `A` is stored in CSC format; each passive-set subproblem is
//! solved densely through an SVD.
//!
//! # Termination
//!
//! The outer loop stops once no constrained variable has a gradient
//! component above `tolerance · max|Aᵀb|`. Outer and inner iterations share
//! a budget of `max_iterations_factor · n`; exhausting it is an error.

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CscMatrix};
use tracing::{debug, trace};

use crate::config::NnlsOptions;
use crate::error::{ElasticError, Result};

/// Result of a successful NNLS solve.
#[derive(Debug, Clone, PartialEq)]
pub struct NnlsSolution {
    /// Non-negative minimizer.
    pub x: DVector<f64>,
    /// `‖A x − b‖₂` at the minimizer.
    pub residual_norm: f64,
}

/// NNLS solver bound to a fixed system matrix.
#[derive(Debug, Clone)]
pub struct NnlsSolver {
    matrix: CscMatrix<f64>,
}

impl NnlsSolver {
    /// Builds a solver from a dense matrix. Exact zeros are not stored.
    ///
    /// # Errors
    ///
    /// Returns [`ElasticError::Solver`] if `a` has non-finite entries.
    pub fn from_dense(a: &DMatrix<f64>) -> Result<Self> {
        if a.iter().any(|v| !v.is_finite()) {
            return Err(ElasticError::solver("system matrix has non-finite entries"));
        }
        let mut coo = CooMatrix::new(a.nrows(), a.ncols());
        for col in 0..a.ncols() {
            for row in 0..a.nrows() {
                let val = a[(row, col)];
                if val != 0.0 {
                    coo.push(row, col, val);
                }
            }
        }
        Ok(Self {
            matrix: CscMatrix::from(&coo),
        })
    }

    /// Builds a solver from `rows × cols` values in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`ElasticError::ShapeMismatch`] if `values` does not hold
    /// exactly `rows · cols` entries, or [`ElasticError::Solver`] if any of
    /// them is non-finite.
    pub fn from_row_major(rows: usize, cols: usize, values: &[f64]) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(ElasticError::ShapeMismatch {
                expected_rows: rows,
                expected_cols: cols,
                actual_rows: values.len(),
                actual_cols: 1,
            });
        }
        Self::from_dense(&DMatrix::from_row_slice(rows, cols, values))
    }

    /// Number of equations.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of unknowns.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    /// The underlying CSC matrix.
    #[must_use]
    pub const fn csc(&self) -> &CscMatrix<f64> {
        &self.matrix
    }

    fn mul_vec(&self, x: &DVector<f64>) -> DVector<f64> {
        let mut out = DVector::zeros(self.nrows());
        for (j, col) in self.matrix.col_iter().enumerate() {
            let xj = x[j];
            for (&i, &val) in col.row_indices().iter().zip(col.values()) {
                out[i] += val * xj;
            }
        }
        out
    }

    fn mul_transpose_vec(&self, v: &DVector<f64>) -> DVector<f64> {
        DVector::from_iterator(
            self.ncols(),
            self.matrix.col_iter().map(|col| {
                col.row_indices()
                    .iter()
                    .zip(col.values())
                    .map(|(&i, &val)| val * v[i])
                    .sum::<f64>()
            }),
        )
    }

    /// Unconstrained least squares restricted to the `passive` columns.
    ///
    /// Entries outside the passive set are zero.
    #[allow(clippy::cast_precision_loss)]
    fn solve_passive(&self, passive: &[bool], b: &DVector<f64>) -> Result<DVector<f64>> {
        let columns: Vec<usize> = (0..self.ncols()).filter(|&j| passive[j]).collect();
        if columns.is_empty() {
            return Ok(DVector::zeros(self.ncols()));
        }
        let mut sub = DMatrix::zeros(self.nrows(), columns.len());
        for (k, &j) in columns.iter().enumerate() {
            let col = self.matrix.col(j);
            for (&i, &val) in col.row_indices().iter().zip(col.values()) {
                sub[(i, k)] = val;
            }
        }

        let svd = sub.svd(true, true);
        let sigma_max = svd.singular_values.max();
        let eps = self.nrows().max(columns.len()) as f64 * sigma_max * f64::EPSILON;
        let z = svd.solve(b, eps).map_err(ElasticError::solver)?;

        let mut full = DVector::zeros(self.ncols());
        for (k, &j) in columns.iter().enumerate() {
            full[j] = z[k];
        }
        Ok(full)
    }

    /// Solves `min ‖A x − b‖₂` subject to `x ≥ 0`.
    ///
    /// # Errors
    ///
    /// - [`ElasticError::ShapeMismatch`] if `b` has the wrong length
    /// - [`ElasticError::InvalidParams`] if `options` are invalid
    /// - [`ElasticError::Solver`] if `b`, `Aᵀb` or an iterate is non-finite, or the
    ///   iteration budget runs out
    ///
    /// # Example
    ///
    /// ```
    /// use nalgebra::DVector;
    /// use skin_elastic::{NnlsOptions, NnlsSolver};
    ///
    /// // The unconstrained solution is (1, -1); the constrained one clamps y.
    /// let solver = NnlsSolver::from_row_major(2, 2, &[1.0, 0.0, 0.0, 1.0]).unwrap();
    /// let sol = solver
    ///     .solve(&DVector::from_vec(vec![1.0, -1.0]), &NnlsOptions::default())
    ///     .unwrap();
    /// assert!((sol.x[0] - 1.0).abs() < 1e-12);
    /// assert_eq!(sol.x[1], 0.0);
    /// ```
    pub fn solve(&self, b: &DVector<f64>, options: &NnlsOptions) -> Result<NnlsSolution> {
        options.validate().map_err(ElasticError::InvalidParams)?;
        if b.len() != self.nrows() {
            return Err(ElasticError::ShapeMismatch {
                expected_rows: self.nrows(),
                expected_cols: 1,
                actual_rows: b.len(),
                actual_cols: 1,
            });
        }

        if b.iter().any(|v| !v.is_finite()) {
            return Err(ElasticError::solver("right-hand side has non-finite entries"));
        }

        let n = self.ncols();
        let mut x = DVector::zeros(n);
        let scale = self.mul_transpose_vec(b).amax();
        if !scale.is_finite() {
            return Err(ElasticError::solver("Aᵀb overflowed"));
        }
        if scale == 0.0 || n == 0 {
            return Ok(self.finish(x, b));
        }

        let threshold = options.tolerance * scale;
        let max_iterations = options.max_iterations(n);
        let mut passive = vec![false; n];
        let mut iterations = 0usize;

        loop {
            let residual = b - self.mul_vec(&x);
            let w = self.mul_transpose_vec(&residual);

            let candidate = (0..n)
                .filter(|&j| !passive[j] && w[j] > threshold)
                .max_by(|&i, &j| w[i].total_cmp(&w[j]));
            let Some(j) = candidate else {
                break;
            };

            iterations += 1;
            if iterations > max_iterations {
                return Err(ElasticError::solver(format!(
                    "no convergence within {max_iterations} iterations"
                )));
            }
            passive[j] = true;
            trace!(iteration = iterations, index = j, gradient = w[j], "Freeing variable");

            loop {
                let z = self.solve_passive(&passive, b)?;
                if z.iter().any(|v| !v.is_finite()) {
                    return Err(ElasticError::solver("non-finite iterate"));
                }

                if (0..n).all(|k| !passive[k] || z[k] > 0.0) {
                    x = z;
                    break;
                }

                iterations += 1;
                if iterations > max_iterations {
                    return Err(ElasticError::solver(format!(
                        "no convergence within {max_iterations} iterations"
                    )));
                }

                // Step from x towards z until the first passive variable hits zero.
                let mut alpha = f64::INFINITY;
                let mut blocking = j;
                for k in (0..n).filter(|&k| passive[k] && z[k] <= 0.0) {
                    let step = x[k] / (x[k] - z[k]);
                    if step < alpha {
                        alpha = step;
                        blocking = k;
                    }
                }

                let step = (&z - &x) * alpha;
                x += step;
                x[blocking] = 0.0;
                for k in 0..n {
                    if passive[k] && x[k] <= 0.0 {
                        x[k] = 0.0;
                        passive[k] = false;
                    }
                }
            }
        }

        debug!(iterations, unknowns = n, "NNLS converged");
        Ok(self.finish(x, b))
    }

    /// Convenience wrapper over [`solve`](Self::solve) for slices.
    ///
    /// # Errors
    ///
    /// Same as [`solve`](Self::solve).
    pub fn solve_slice(&self, b: &[f64], options: &NnlsOptions) -> Result<NnlsSolution> {
        self.solve(&DVector::from_column_slice(b), options)
    }

    fn finish(&self, x: DVector<f64>, b: &DVector<f64>) -> NnlsSolution {
        let residual_norm = (self.mul_vec(&x) - b).norm();
        debug!(residual_norm, "NNLS residual");
        NnlsSolution { x, residual_norm }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn solve(rows: usize, cols: usize, a: &[f64], b: &[f64]) -> NnlsSolution {
        NnlsSolver::from_row_major(rows, cols, a)
            .unwrap()
            .solve_slice(b, &NnlsOptions::default())
            .unwrap()
    }

    #[test]
    fn test_unconstrained_optimum_is_feasible() {
        let sol = solve(2, 2, &[2.0, 1.0, 1.0, 3.0], &[3.0, 4.0]);
        assert_relative_eq!(sol.x[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(sol.x[1], 1.0, epsilon = 1e-10);
        assert!(sol.residual_norm < 1e-10);
    }

    #[test]
    fn test_clamps_negative_component() {
        let sol = solve(2, 2, &[1.0, 0.0, 0.0, 1.0], &[2.0, -3.0]);
        assert_relative_eq!(sol.x[0], 2.0, epsilon = 1e-12);
        assert_eq!(sol.x[1], 0.0);
        assert_relative_eq!(sol.residual_norm, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_coupled_columns() {
        // Unconstrained solution of [1 1; 1 2] x = [1, 0] is (2, -1).
        // With x >= 0 the optimum is (0.5, 0).
        let sol = solve(2, 2, &[1.0, 1.0, 1.0, 2.0], &[1.0, 0.0]);
        assert!(sol.x.iter().all(|&v| v >= 0.0));
        assert_eq!(sol.x[1], 0.0);
        assert_relative_eq!(sol.x[0], 0.5, epsilon = 1e-10);
    }

    #[test]
    fn test_overdetermined() {
        // Least squares line through (1, 1), (2, 2), (3, 3) with no intercept.
        let sol = solve(3, 1, &[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert_relative_eq!(sol.x[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_rhs() {
        let sol = solve(2, 2, &[1.0, 2.0, 3.0, 4.0], &[0.0, 0.0]);
        assert_eq!(sol.x, DVector::zeros(2));
        assert_eq!(sol.residual_norm, 0.0);
    }

    #[test]
    fn test_all_gradients_negative() {
        let sol = solve(2, 2, &[1.0, 0.0, 0.0, 1.0], &[-1.0, -2.0]);
        assert_eq!(sol.x, DVector::zeros(2));
    }

    #[test]
    fn test_wrong_rhs_length() {
        let solver = NnlsSolver::from_row_major(2, 2, &[1.0, 0.0, 0.0, 1.0]).unwrap();
        let err = solver.solve_slice(&[1.0], &NnlsOptions::default()).unwrap_err();
        assert!(matches!(err, ElasticError::ShapeMismatch { actual_rows: 1, .. }));
    }

    #[test]
    fn test_from_row_major_length_check() {
        assert!(NnlsSolver::from_row_major(2, 2, &[1.0]).is_err());
    }

    #[test]
    fn test_non_finite_matrix_rejected() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, f64::INFINITY, 0.0, 1.0]);
        assert!(matches!(NnlsSolver::from_dense(&a), Err(ElasticError::Solver { .. })));
        assert!(matches!(
            NnlsSolver::from_row_major(1, 2, &[f64::NAN, 1.0]),
            Err(ElasticError::Solver { .. })
        ));
    }

    #[test]
    fn test_overflowing_gradient_rejected() {
        let solver = NnlsSolver::from_row_major(2, 1, &[1e300, 1e300]).unwrap();
        let err = solver.solve_slice(&[1e10, 1e10], &NnlsOptions::default()).unwrap_err();
        assert!(matches!(err, ElasticError::Solver { .. }));
    }

    #[test]
    fn test_sparse_storage() {
        let solver = NnlsSolver::from_row_major(2, 3, &[1.0, 0.0, 2.0, 0.0, 0.0, 3.0]).unwrap();
        assert_eq!(solver.nrows(), 2);
        assert_eq!(solver.ncols(), 3);
        assert_eq!(solver.nnz(), 3);
    }

    #[test]
    fn test_invalid_options() {
        let solver = NnlsSolver::from_row_major(1, 1, &[1.0]).unwrap();
        let options = NnlsOptions {
            max_iterations_factor: 0,
            tolerance: 1e-10,
        };
        assert!(matches!(
            solver.solve_slice(&[1.0], &options),
            Err(ElasticError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_kkt_conditions() {
        let a = [
            0.8, 0.1, 0.3, 0.0, //
            0.2, 0.9, 0.1, 0.4, //
            0.5, 0.3, 0.7, 0.2, //
            0.1, 0.6, 0.2, 0.9, //
            0.3, 0.2, 0.8, 0.1,
        ];
        let b = [1.0, -0.5, 0.7, -1.2, 0.4];
        let solver = NnlsSolver::from_row_major(5, 4, &a).unwrap();
        let sol = solver.solve_slice(&b, &NnlsOptions::precise()).unwrap();

        let dense = DMatrix::from_row_slice(5, 4, &a);
        let grad = dense.transpose() * (DVector::from_column_slice(&b) - &dense * &sol.x);
        for k in 0..4 {
            assert!(sol.x[k] >= 0.0);
            // Active variables have a non-positive gradient, passive ones zero.
            if sol.x[k] == 0.0 {
                assert!(grad[k] <= 1e-9);
            } else {
                assert!(grad[k].abs() <= 1e-9);
            }
        }
    }
}
