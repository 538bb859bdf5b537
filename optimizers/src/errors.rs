use lin_reg::LinRegError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    LinReg(#[from] LinRegError),

    #[error("no candidate alpha produced a finite score")]
    NoFiniteScore,

    #[error("worker evaluating alpha {0} terminated without reporting a result")]
    WorkerLost(f64),
}
