//! QUBO to Ising Hamiltonian.

use tracing::debug;

use crate::error::{OptError, OptResult};
use crate::problems::{PauliHamiltonian, PauliTerm, QuadraticProgram, VarType};

/// Map an unconstrained binary program onto a diagonal Hamiltonian.
///
/// Each `x_i` becomes `(1 - Z_i) / 2` on qubit `i`, and the objective is
/// multiplied by its sense sign so that minimizing the Hamiltonian optimizes
/// the program. Returns the operator and the constant offset kept out of it:
/// for every basis state `x`, `H(x) + offset = sign · f(x)`.
pub fn to_ising(problem: &QuadraticProgram) -> OptResult<(PauliHamiltonian, f64)> {
    if let Some(c) = problem.linear_constraints().first() {
        return Err(OptError::UnsupportedConstraint(format!(
            "constraint '{}' must be converted before translating to an Ising operator",
            c.name
        )));
    }
    if let Some(v) = problem
        .variables()
        .iter()
        .find(|v| v.vartype != VarType::Binary)
    {
        return Err(OptError::InvalidProblem(format!(
            "variable '{}' is not binary",
            v.name
        )));
    }

    let objective = problem.objective();
    let sign = objective.sense.sign();
    let mut offset = sign * objective.constant;
    let mut terms = Vec::new();

    for (&i, &a) in &objective.linear {
        let weight = sign * a / 2.0;
        terms.push(PauliTerm::z(-weight, i));
        offset += weight;
    }

    for (&(i, j), &q) in &objective.quadratic {
        let weight = sign * q / 4.0;
        if i == j {
            // x_i^2 = x_i
            offset += 2.0 * weight;
            terms.push(PauliTerm::z(-2.0 * weight, i));
        } else {
            offset += weight;
            terms.push(PauliTerm::zz(weight, i, j));
            terms.push(PauliTerm::z(-weight, i));
            terms.push(PauliTerm::z(-weight, j));
        }
    }

    let hamiltonian = PauliHamiltonian::new(terms)
        .simplify()
        .with_num_qubits(problem.num_vars());
    debug!(
        num_qubits = hamiltonian.num_qubits(),
        num_terms = hamiltonian.num_terms(),
        offset,
        "translated program to Ising operator"
    );
    Ok((hamiltonian, offset))
}
