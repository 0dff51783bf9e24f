//! Error types for modeling, conversion and solving.

use knapq_hal::HalError;
use knapq_ir::IrError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptError {
    #[error("invalid problem: {0}")]
    InvalidProblem(String),

    #[error("variable '{0}' already exists")]
    DuplicateVariable(String),

    #[error("variable index {index} out of range for problem with {num_vars} variables")]
    VariableIndexOutOfRange { index: usize, num_vars: usize },

    #[error("expected {expected} values, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("unsupported constraint: {0}")]
    UnsupportedConstraint(String),

    #[error("coefficient of {term} must be integral, got {value}")]
    NonIntegerCoefficient { term: String, value: f64 },

    #[error("operator term {0} is not diagonal in the computational basis")]
    NonDiagonalOperator(String),

    #[error("expected {expected} circuit parameters, got {got}")]
    ParameterCountMismatch { expected: usize, got: usize },

    #[error("{0} has not converted a problem yet")]
    NotConverted(&'static str),

    #[error("backend error: {0}")]
    Hal(#[from] HalError),

    #[error("circuit error: {0}")]
    Ir(#[from] IrError),
}

pub type OptResult<T> = Result<T, OptError>;
