//! Hyperparameter search over the regularization strength

#[macro_use]
extern crate log;

use lin_reg::{FittedModel, LinReg, LinRegError};

mod errors;
mod grid_search;
mod holdout;
mod utils;

pub use errors::SweepError;
pub use grid_search::{sweep, sweep_with_config, GridSearch, SweepConfig, SweepResult, Trial};
pub use holdout::HoldoutEnvironment;
pub use utils::log_space;

pub trait OptEnvironment<R>
where
    R: LinReg,
{
    /// Fits the regressor and evaluates its performance in the environment
    ///
    /// # Arguments:
    /// regressor: the configured linear regression to fit
    ///
    /// # Returns:
    /// the fitted model and its score, where higher is better
    fn evaluate(&self, regressor: &R) -> Result<(FittedModel, f64), LinRegError>;
}
