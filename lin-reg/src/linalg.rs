//! Small matrix helpers shared by the solvers

use nalgebra::{DMatrix, DVector};
use num::Float;

use crate::LinRegError;

/// The mean of every column of `m`
pub fn column_means(m: &DMatrix<f64>) -> DVector<f64> {
    let n = m.nrows() as f64;
    DVector::from_iterator(m.ncols(), m.column_iter().map(|c| c.sum() / n))
}

/// Subtracts the column means from every column.
///
/// # Returns:
/// The centered matrix and the means that have been removed
pub fn center_columns(m: &DMatrix<f64>) -> (DMatrix<f64>, DVector<f64>) {
    let means = column_means(m);
    let mut centered = m.clone();
    for (mut col, mean) in centered.column_iter_mut().zip(means.iter()) {
        col.add_scalar_mut(-*mean);
    }

    (centered, means)
}

/// The squared euclidean norm of every column of `m`
pub fn column_norms_sq(m: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_iterator(m.ncols(), m.column_iter().map(|c| c.norm_squared()))
}

/// sign(x) * max(|x| - t, 0)
#[inline(always)]
pub fn soft_threshold<F: Float>(x: F, t: F) -> F {
    if x > t {
        x - t
    } else if x < -t {
        x + t
    } else {
        F::zero()
    }
}

/// Recovers the intercept of the uncentered problem: b = mean(Y) - Wᵗ mean(X)
pub fn intercept(
    target_means: &DVector<f64>,
    design_means: &DVector<f64>,
    coefficients: &DMatrix<f64>,
) -> DVector<f64> {
    target_means - coefficients.tr_mul(design_means)
}

/// Fails if any entry of `m` is NaN or infinite
pub fn check_finite(m: &DMatrix<f64>, name: &'static str) -> Result<(), LinRegError> {
    if m.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(LinRegError::NonFiniteInput(name))
    }
}
