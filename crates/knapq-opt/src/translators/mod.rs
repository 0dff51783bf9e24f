//! Translation between quadratic programs and qubit operators.

pub mod ising;

pub use ising::to_ising;
