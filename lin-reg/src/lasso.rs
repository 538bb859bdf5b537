use nalgebra::{DMatrix, DVector, DVectorView};

use super::{validate_alpha, validate_inputs, FittedModel, LinReg, LinRegError};
use crate::linalg::{center_columns, column_norms_sq, intercept, soft_threshold};

/// Columns whose centered squared norm falls below this share of the largest
/// one are constant up to rounding and carry no signal
const REL_COLUMN_NORM_SQ: f64 = f64::EPSILON;

/// L1 penalized least squares, fit with cyclic coordinate descent.
///
/// Minimizes `1 / (2 * n_samples) * ||y - Xw||² + alpha * ||w||₁` for every
/// output column independently.
#[derive(Debug, Clone)]
pub struct Lasso {
    alpha: f64,
    max_iter: usize,
    tol: f64,
}

impl Lasso {
    /// Number of coordinate cycles allowed by `Lasso::new`
    pub const DEFAULT_MAX_ITER: usize = 1000;
    /// Convergence threshold on the largest coefficient change used by `Lasso::new`
    pub const DEFAULT_TOL: f64 = 1e-4;

    /// Create a new lasso regressor with default iteration cap and tolerance
    pub fn new(alpha: f64) -> Result<Self, LinRegError> {
        Self::with_params(alpha, Self::DEFAULT_MAX_ITER, Self::DEFAULT_TOL)
    }

    /// Create a new lasso regressor
    ///
    /// # Arguments:
    /// alpha: strength of the L1 penalty, must be finite and positive
    /// max_iter: maximum number of full cycles over the features, at least 1
    /// tol: stop once no coefficient moves by more than this in a cycle
    pub fn with_params(alpha: f64, max_iter: usize, tol: f64) -> Result<Self, LinRegError> {
        validate_alpha(alpha)?;
        if max_iter == 0 {
            return Err(LinRegError::InvalidConfig("max_iter must be at least 1".to_string()));
        }
        if !tol.is_finite() || tol <= 0.0 {
            return Err(LinRegError::InvalidConfig(format!(
                "tol must be a finite positive number, got {}",
                tol
            )));
        }

        Ok(Self { alpha, max_iter, tol })
    }

    /// Replace the iteration cap
    pub fn with_max_iter(self, max_iter: usize) -> Result<Self, LinRegError> {
        Self::with_params(self.alpha, max_iter, self.tol)
    }

    /// Replace the convergence tolerance
    pub fn with_tol(self, tol: f64) -> Result<Self, LinRegError> {
        Self::with_params(self.alpha, self.max_iter, tol)
    }

    #[inline(always)]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    #[inline(always)]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// The smallest alpha for which every coefficient is exactly zero
    pub fn alpha_max(design: &DMatrix<f64>, targets: &DMatrix<f64>) -> Result<f64, LinRegError> {
        validate_inputs(design, targets)?;

        let (design_c, _) = center_columns(design);
        let (targets_c, _) = center_columns(targets);
        let correlations = design_c.tr_mul(&targets_c);

        Ok(correlations.abs().max() / design.nrows() as f64)
    }

    /// Coordinate descent on a single output column
    ///
    /// # Returns:
    /// The coefficients, the number of cycles performed and whether tol was met
    fn fit_output(
        &self,
        design_c: &DMatrix<f64>,
        norms_sq: &DVector<f64>,
        target_c: DVectorView<f64>,
    ) -> (DVector<f64>, usize, bool) {
        let threshold = self.alpha * design_c.nrows() as f64;
        let min_norm_sq = REL_COLUMN_NORM_SQ * norms_sq.max();

        let mut weights: DVector<f64> = DVector::zeros(design_c.ncols());
        // residual of the current weights, starting from w = 0
        let mut residual: DVector<f64> = target_c.into_owned();

        for iter in 1..=self.max_iter {
            let mut max_change: f64 = 0.0;

            for k in 0..design_c.ncols() {
                if norms_sq[k] <= min_norm_sq {
                    continue;
                }
                let col = design_c.column(k);
                let w_old = weights[k];

                let rho = col.dot(&residual) + norms_sq[k] * w_old;
                let w_new = soft_threshold(rho, threshold) / norms_sq[k];

                let delta = w_new - w_old;
                if delta != 0.0 {
                    residual.axpy(-delta, &col, 1.0);
                    weights[k] = w_new;
                }
                max_change = max_change.max(delta.abs());
            }

            if max_change < self.tol {
                return (weights, iter, true);
            }
        }

        (weights, self.max_iter, false)
    }
}

impl LinReg for Lasso {
    fn fit(&self, design: &DMatrix<f64>, targets: &DMatrix<f64>) -> Result<FittedModel, LinRegError> {
        validate_inputs(design, targets)?;

        let (design_c, design_means) = center_columns(design);
        let (targets_c, target_means) = center_columns(targets);
        let norms_sq = column_norms_sq(&design_c);

        let mut coefficients: DMatrix<f64> = DMatrix::zeros(design.ncols(), targets.ncols());
        let mut n_iter = 0;
        let mut converged = true;
        for j in 0..targets.ncols() {
            let (weights, iters, output_converged) =
                self.fit_output(&design_c, &norms_sq, targets_c.column(j));
            coefficients.set_column(j, &weights);

            n_iter = n_iter.max(iters);
            converged &= output_converged;
        }

        if !converged {
            warn!(
                "lasso with alpha {} did not converge within {} iterations (tol {})",
                self.alpha, self.max_iter, self.tol
            );
        }
        let intercept = intercept(&target_means, &design_means, &coefficients);
        debug!(
            "lasso fit with alpha {}: {} cycles, {} of {} coefficients are zero",
            self.alpha,
            n_iter,
            coefficients.iter().filter(|v| **v == 0.0).count(),
            coefficients.len()
        );

        Ok(FittedModel {
            coefficients,
            intercept,
            n_iter,
            converged,
        })
    }

    #[inline(always)]
    fn alpha(&self) -> f64 {
        self.alpha
    }
}
