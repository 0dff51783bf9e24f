//! Circuit intermediate representation for knapq.
//!
//! A [`Circuit`] is a flat, ordered list of [`Instruction`]s over a fixed
//! register of qubits and classical bits. Angles are bound at construction
//! time, so a variational algorithm builds a fresh circuit for every
//! parameter vector it evaluates.
//!
//! # Example
//!
//! ```
//! use knapq_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateKind, PhaseOracle, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
