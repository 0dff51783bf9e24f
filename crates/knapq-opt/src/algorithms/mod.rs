//! Optimization algorithms.
//!
//! [`MinimumEigenOptimizer`] solves a program through any
//! [`MinimumEigensolver`]; [`GroverOptimizer`] runs Grover adaptive search
//! directly on the QUBO. Both implement [`OptimizationAlgorithm`].

pub mod exact;
pub mod grover_optimizer;
pub mod minimum_eigen_optimizer;
pub mod minimum_eigensolver;
pub mod qaoa;
pub mod result;
pub mod vqe;

pub use exact::ExactEigensolver;
pub use grover_optimizer::{GroverOptimizationResult, GroverOptimizer};
pub use minimum_eigen_optimizer::MinimumEigenOptimizer;
pub use minimum_eigensolver::{MinimumEigensolver, MinimumEigensolverResult};
pub use qaoa::Qaoa;
pub use result::{OptimizationAlgorithm, OptimizationResult, OptimizationStatus, SolutionSample};
pub use vqe::Vqe;
