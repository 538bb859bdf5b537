use nalgebra::{DMatrix, DVector};

use crate::LinRegError;

/// The result of fitting a regressor
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    /// Coefficient matrix of shape (n_features, n_outputs)
    pub coefficients: DMatrix<f64>,
    /// Per-output intercept of length n_outputs
    pub intercept: DVector<f64>,
    /// Number of full coordinate cycles used, 0 for closed form solvers
    pub n_iter: usize,
    /// Whether the solver met its tolerance before the iteration cap
    pub converged: bool,
}

impl FittedModel {
    /// Number of features the model was fit on
    #[inline(always)]
    pub fn n_features(&self) -> usize {
        self.coefficients.nrows()
    }

    /// Number of outputs the model predicts
    #[inline(always)]
    pub fn n_outputs(&self) -> usize {
        self.coefficients.ncols()
    }

    /// Predict the targets for every row of `design`
    pub fn predict(&self, design: &DMatrix<f64>) -> Result<DMatrix<f64>, LinRegError> {
        if design.ncols() != self.n_features() {
            return Err(LinRegError::DimensionMismatch {
                context: "design columns vs model features",
                expected: self.n_features(),
                got: design.ncols(),
            });
        }

        let mut predictions = design * &self.coefficients;
        for (mut col, b) in predictions.column_iter_mut().zip(self.intercept.iter()) {
            col.add_scalar_mut(*b);
        }

        Ok(predictions)
    }

    /// Number of coefficients that are exactly zero
    pub fn num_zero_coefficients(&self) -> usize {
        self.coefficients.iter().filter(|v| **v == 0.0).count()
    }

    /// Indices of features that contribute to at least one output
    pub fn active_features(&self) -> Vec<usize> {
        self.coefficients
            .row_iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|v| *v != 0.0))
            .map(|(i, _)| i)
            .collect()
    }
}
