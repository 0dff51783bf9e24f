//! Parameterized circuit families used by the solvers.

pub mod efficient_su2;
pub mod grover;
pub mod qaoa;

pub use efficient_su2::{EfficientSu2, Entanglement};
pub use grover::{diffuser, grover_circuit};
pub use qaoa::qaoa_ansatz;
