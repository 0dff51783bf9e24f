//! Harness error types.

use knapq_hal::HalError;
use knapq_opt::OptError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid benchmark parameters: {0}")]
    InvalidParams(String),

    #[error("backend '{0}' is not available")]
    BackendUnavailable(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Opt(#[from] OptError),

    #[error(transparent)]
    Hal(#[from] HalError),
}

pub type BenchResult<T> = Result<T, BenchError>;
