use thiserror::Error;

/// Everything that can go wrong while fitting or applying a linear model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinRegError {
    #[error("dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("input matrices must contain at least one sample, feature and output")]
    EmptyInput,

    #[error("{0} contains non-finite values")]
    NonFiniteInput(&'static str),

    #[error("regularized normal equations are not positive definite")]
    SingularSystem,
}
