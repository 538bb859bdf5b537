//! Regularized multi-output linear regression

#[macro_use]
extern crate log;

use nalgebra::DMatrix;

mod errors;
mod fitted_model;
mod lasso;
pub mod linalg;
mod ridge_regression;
#[cfg(test)]
mod test_utils;

pub use errors::LinRegError;
pub use fitted_model::FittedModel;
pub use lasso::Lasso;
pub use ridge_regression::RidgeRegression;

/// Generic way of performing linear regression and fitting the coefficient matrix
pub trait LinReg: Clone {
    /// Fit a coefficient matrix and intercept, mapping the design to the targets
    ///
    /// # Parameters
    /// design: Input data with samples as rows and features as columns.
    /// No column of 1s is needed, the intercept is absorbed by centering.
    /// targets: Target data with the same number of rows, one column per output
    fn fit(&self, design: &DMatrix<f64>, targets: &DMatrix<f64>) -> Result<FittedModel, LinRegError>;

    /// The regularization strength of this regressor
    fn alpha(&self) -> f64;
}

/// Checks the shared preconditions of all regressors
pub(crate) fn validate_inputs(design: &DMatrix<f64>, targets: &DMatrix<f64>) -> Result<(), LinRegError> {
    if design.nrows() != targets.nrows() {
        return Err(LinRegError::DimensionMismatch {
            context: "design rows vs target rows",
            expected: design.nrows(),
            got: targets.nrows(),
        });
    }
    if design.nrows() == 0 || design.ncols() == 0 || targets.ncols() == 0 {
        return Err(LinRegError::EmptyInput);
    }
    linalg::check_finite(design, "design")?;
    linalg::check_finite(targets, "targets")?;

    Ok(())
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<(), LinRegError> {
    if !alpha.is_finite() || alpha <= 0.0 {
        return Err(LinRegError::InvalidConfig(format!(
            "alpha must be a finite positive number, got {}",
            alpha
        )));
    }
    Ok(())
}
