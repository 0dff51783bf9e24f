//! The minimum-eigensolver seam shared by QAOA, VQE and exact diagonalization.

use serde::{Deserialize, Serialize};

use knapq_hal::{Distribution, QuantumInstance};
use knapq_ir::Circuit;

use crate::error::{OptError, OptResult};
use crate::problems::PauliHamiltonian;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumEigensolverResult {
    /// Lowest energy found, excluding any offset kept outside the operator.
    pub eigenvalue: f64,
    /// Measured distribution of the state at the optimum.
    pub eigenstate: Distribution,
    pub optimal_parameters: Vec<f64>,
    pub optimizer_evals: usize,
    pub optimizer_iterations: usize,
    pub energy_history: Vec<f64>,
}

/// Approximates the ground state of a diagonal Hamiltonian.
pub trait MinimumEigensolver {
    fn compute_minimum_eigenvalue(
        &self,
        operator: &PauliHamiltonian,
    ) -> OptResult<MinimumEigensolverResult>;
}

pub(crate) fn ensure_diagonal(operator: &PauliHamiltonian) -> OptResult<()> {
    match operator.first_non_diagonal() {
        Some(term) => Err(OptError::NonDiagonalOperator(
            term.label(operator.num_qubits()),
        )),
        None => Ok(()),
    }
}

/// Measure `circuit` on `instance` and average the diagonal energy of
/// `operator` over the outcomes.
pub(crate) fn estimate_energy(
    instance: &QuantumInstance,
    mut circuit: Circuit,
    operator: &PauliHamiltonian,
) -> OptResult<(f64, Distribution)> {
    circuit.measure_all()?;
    let distribution = instance.execute(&circuit)?;
    let energy = distribution.expectation(|basis| operator.diagonal_value(basis));
    Ok((energy, distribution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::PauliTerm;
    use knapq_adapter_sim::SimBackend;
    use knapq_ir::QubitId;
    use std::sync::Arc;

    #[test]
    fn test_estimate_energy_exact() {
        let instance = QuantumInstance::new(Arc::new(SimBackend::new())).with_exact_probabilities();
        let op = PauliHamiltonian::new(vec![PauliTerm::z(1.0, 0), PauliTerm::identity(0.5)]);
        let mut circuit = Circuit::with_size("plus", 1, 0);
        circuit.h(QubitId(0)).unwrap();

        let (energy, dist) = estimate_energy(&instance, circuit, &op).unwrap();
        assert!((energy - 0.5).abs() < 1e-9);
        assert_eq!(dist.len(), 2);
    }

    #[test]
    fn test_ensure_diagonal() {
        assert!(ensure_diagonal(&PauliHamiltonian::new(vec![PauliTerm::z(1.0, 0)])).is_ok());
        let op = PauliHamiltonian::new(vec![PauliTerm::xx(1.0, 0, 1)]);
        assert!(matches!(
            ensure_diagonal(&op),
            Err(OptError::NonDiagonalOperator(_))
        ));
    }
}
