//! Problem definitions.

pub mod hamiltonian;
pub mod knapsack;
pub mod quadratic_program;

pub use hamiltonian::{Pauli, PauliHamiltonian, PauliTerm};
pub use knapsack::Knapsack;
pub use quadratic_program::{
    ConstraintSense, LinearConstraint, ObjSense, QuadraticObjective, QuadraticProgram, VarType,
    Variable,
};
