//! Local statevector simulator for knapq.
//!
//! [`SimBackend`] implements [`knapq_hal::Backend`] by evolving a dense
//! statevector and either sampling shots from it with a seeded RNG or
//! returning the exact outcome distribution.
//!
//! Only terminal measurements are supported: once a qubit is measured, no
//! further gate may act on it. A circuit without measurements is treated as
//! if every qubit were measured into the classical bit of the same index.

pub mod backend;
pub mod statevector;

pub use backend::{DEFAULT_MAX_QUBITS, SimBackend};
pub use statevector::Statevector;
