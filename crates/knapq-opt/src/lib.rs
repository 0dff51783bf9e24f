//! Optimization library behind the knapq benchmarks.
//!
//! The pipeline mirrors the usual quantum-optimization stack:
//!
//! - **Modeling**: [`QuadraticProgram`] and the [`Knapsack`] application
//! - **Conversion**: [`QuadraticProgramToQubo`] turns a constrained integer
//!   program into an unconstrained binary one
//! - **Translation**: [`to_ising`] maps a QUBO onto a diagonal
//!   [`PauliHamiltonian`]
//! - **Solving**: [`MinimumEigenOptimizer`] driving [`Qaoa`] or [`Vqe`], and
//!   the Grover adaptive search in [`GroverOptimizer`]
//!
//! Every solver implements [`OptimizationAlgorithm`], so callers can swap
//! strategies behind one `solve` call.
//!
//! ```ignore
//! use knapq_opt::{Cobyla, Knapsack, MinimumEigenOptimizer, OptimizationAlgorithm, Qaoa};
//!
//! let knapsack = Knapsack::new(vec![3, 1], vec![2, 1], 2)?;
//! let qp = knapsack.to_quadratic_program()?;
//! let qaoa = Qaoa::new(Cobyla::new().with_maxiter(1), quantum_instance);
//! let result = MinimumEigenOptimizer::new(qaoa).solve(&qp)?;
//! println!("{result}");
//! ```

pub mod algorithms;
pub mod circuits;
pub mod converters;
pub mod error;
pub mod optimizers;
pub mod problems;
pub mod translators;

pub use algorithms::{
    ExactEigensolver, GroverOptimizationResult, GroverOptimizer, MinimumEigenOptimizer,
    MinimumEigensolver, MinimumEigensolverResult, OptimizationAlgorithm, OptimizationResult,
    OptimizationStatus, Qaoa, SolutionSample, Vqe,
};
pub use circuits::{EfficientSu2, Entanglement};
pub use converters::{
    InequalityToEquality, IntegerToBinary, LinearEqualityToPenalty, QuadraticProgramConverter,
    QuadraticProgramToQubo,
};
pub use error::{OptError, OptResult};
pub use optimizers::{Cobyla, OptimizerResult, Optimizer};
pub use problems::{
    ConstraintSense, Knapsack, LinearConstraint, ObjSense, Pauli, PauliHamiltonian, PauliTerm,
    QuadraticObjective, QuadraticProgram, VarType, Variable,
};
pub use translators::to_ising;
