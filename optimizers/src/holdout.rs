use common::{score, train_test_split, Split};
use lin_reg::{FittedModel, LinReg, LinRegError};
use nalgebra::DMatrix;

use crate::OptEnvironment;

/// Fits on the training part of a single split and scores R² on the held-out part
#[derive(Debug, Clone)]
pub struct HoldoutEnvironment {
    split: Split,
}

impl HoldoutEnvironment {
    /// Split the data once, every evaluation reuses the same partition
    pub fn new(
        design: &DMatrix<f64>,
        targets: &DMatrix<f64>,
        test_fraction: f64,
        seed: u64,
    ) -> Result<Self, LinRegError> {
        Ok(Self::from_split(train_test_split(design, targets, test_fraction, seed)?))
    }

    pub fn from_split(split: Split) -> Self {
        Self { split }
    }

    #[inline(always)]
    pub fn split(&self) -> &Split {
        &self.split
    }
}

impl<R> OptEnvironment<R> for HoldoutEnvironment
where
    R: LinReg,
{
    fn evaluate(&self, regressor: &R) -> Result<(FittedModel, f64), LinRegError> {
        let model = regressor.fit(&self.split.x_train, &self.split.y_train)?;
        let r2 = score(&model, &self.split.x_test, &self.split.y_test)?;
        debug!("alpha {}: held-out R² {}", regressor.alpha(), r2);

        Ok((model, r2))
    }
}
