//! Error types for circuit construction.

use thiserror::Error;

/// Errors raised while building a circuit.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IrError {
    #[error("qubit {qubit} out of range for circuit with {num_qubits} qubits")]
    QubitOutOfRange { qubit: u32, num_qubits: u32 },

    #[error("clbit {clbit} out of range for circuit with {num_clbits} clbits")]
    ClbitOutOfRange { clbit: u32, num_clbits: u32 },

    #[error("qubit {0} used more than once in a single instruction")]
    DuplicateQubit(u32),

    #[error("gate {gate} expects {expected} qubits, got {got}")]
    ArityMismatch {
        gate: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("phase oracle over {num_qubits} qubits needs {expected} entries, got {got}")]
    OracleSizeMismatch {
        num_qubits: usize,
        expected: usize,
        got: usize,
    },
}

/// Result alias for IR operations.
pub type IrResult<T> = Result<T, IrError>;
