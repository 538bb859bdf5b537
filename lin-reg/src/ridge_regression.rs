use nalgebra::DMatrix;

use super::{validate_alpha, validate_inputs, FittedModel, LinReg, LinRegError};
use crate::linalg::{center_columns, intercept};

/// Tikhonov regularization aka ridge regression
/// It is particularly useful to mitigate the problem of multicollinearity in
/// linear regression. All outputs share the same regularized gram matrix, so
/// a single factorization solves for every column of the coefficient matrix.
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    /// Ridge parameter
    alpha: f64,
}

impl RidgeRegression {
    /// Create a new ridge regressor
    ///
    /// # Arguments:
    /// alpha: strength of the L2 penalty, must be finite and positive
    pub fn new(alpha: f64) -> Result<Self, LinRegError> {
        validate_alpha(alpha)?;
        Ok(Self { alpha })
    }
}

impl LinReg for RidgeRegression {
    fn fit(&self, design: &DMatrix<f64>, targets: &DMatrix<f64>) -> Result<FittedModel, LinRegError> {
        validate_inputs(design, targets)?;

        let (design_c, design_means) = center_columns(design);
        let (targets_c, target_means) = center_columns(targets);

        let n_features = design.ncols();
        let reg_m: DMatrix<f64> = DMatrix::from_diagonal_element(n_features, n_features, self.alpha);

        let p0 = design_c.tr_mul(&design_c) + reg_m;
        let coefficients = match p0.cholesky() {
            Some(p1) => p1.solve(&design_c.tr_mul(&targets_c)),
            None => {
                // alpha got lost next to the gram entries
                debug!("regularized gram matrix is not positive definite, solving via svd");
                svd_solve(design_c, &targets_c, self.alpha)?
            }
        };
        let intercept = intercept(&target_means, &design_means, &coefficients);
        debug!(
            "ridge fit with alpha {}: coefficients ({}, {})",
            self.alpha,
            coefficients.nrows(),
            coefficients.ncols()
        );

        Ok(FittedModel {
            coefficients,
            intercept,
            n_iter: 0,
            converged: true,
        })
    }

    #[inline(always)]
    fn alpha(&self) -> f64 {
        self.alpha
    }
}

/// Ridge solution from the thin svd of the centered design,
/// W = V diag(s / (s² + alpha)) Uᵗ Y, which never forms the gram matrix
fn svd_solve(design_c: DMatrix<f64>, targets_c: &DMatrix<f64>, alpha: f64) -> Result<DMatrix<f64>, LinRegError> {
    let svd = design_c
        .try_svd(true, true, f64::EPSILON, 0)
        .ok_or(LinRegError::SingularSystem)?;
    let (u, v_t) = match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => return Err(LinRegError::SingularSystem),
    };

    let mut projected = u.tr_mul(targets_c);
    for (mut row, s) in projected.row_iter_mut().zip(svd.singular_values.iter()) {
        row *= *s / (s * s + alpha);
    }

    Ok(v_t.tr_mul(&projected))
}
