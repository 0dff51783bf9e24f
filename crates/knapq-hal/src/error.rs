//! Backend error types.

use knapq_ir::IrError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HalError {
    #[error("backend '{0}' is not available")]
    Unavailable(String),

    #[error("circuit needs {requested} qubits but backend supports at most {max}")]
    TooManyQubits { requested: usize, max: usize },

    #[error("shots must be positive")]
    InvalidShots,

    #[error("backend '{backend}' does not support {feature}")]
    Unsupported {
        backend: String,
        feature: &'static str,
    },

    #[error("circuit error: {0}")]
    Circuit(#[from] IrError),

    #[error("execution failed: {0}")]
    Execution(String),
}

pub type HalResult<T> = Result<T, HalError>;
