//! Problem converters.
//!
//! Each converter maps a [`QuadraticProgram`] onto an equivalent program in a
//! more restricted form and can map solutions of the result back onto the
//! variables of the input.

pub mod inequality_to_equality;
pub mod integer_to_binary;
pub mod linear_equality_to_penalty;
pub mod quadratic_program_to_qubo;

pub use inequality_to_equality::InequalityToEquality;
pub use integer_to_binary::IntegerToBinary;
pub use linear_equality_to_penalty::LinearEqualityToPenalty;
pub use quadratic_program_to_qubo::QuadraticProgramToQubo;

use crate::error::OptResult;
use crate::problems::QuadraticProgram;

/// A reversible program transformation.
pub trait QuadraticProgramConverter {
    /// Convert `problem`, remembering what is needed to interpret solutions.
    fn convert(&mut self, problem: &QuadraticProgram) -> OptResult<QuadraticProgram>;

    /// Map a solution of the converted program back onto the original one.
    fn interpret(&self, x: &[f64]) -> OptResult<Vec<f64>>;
}

fn is_integral(value: f64) -> bool {
    value.fract() == 0.0
}

/// Copy the variables of `src` into an empty program named after it.
fn copy_variables(src: &QuadraticProgram) -> OptResult<QuadraticProgram> {
    let mut dst = QuadraticProgram::new(src.name());
    for var in src.variables() {
        dst.add_variable(var.clone())?;
    }
    Ok(dst)
}
