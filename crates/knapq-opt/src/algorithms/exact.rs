//! Brute-force reference eigensolver for diagonal Hamiltonians.

use knapq_hal::Distribution;
use tracing::debug;

use super::minimum_eigensolver::{MinimumEigensolver, MinimumEigensolverResult, ensure_diagonal};
use crate::error::{OptError, OptResult};
use crate::problems::PauliHamiltonian;

/// Largest register [`ExactEigensolver`] will enumerate.
pub const MAX_EXACT_QUBITS: usize = 24;

/// Scans every computational basis state; ties go to the lowest index.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactEigensolver;

impl ExactEigensolver {
    pub fn new() -> Self {
        Self
    }
}

impl MinimumEigensolver for ExactEigensolver {
    fn compute_minimum_eigenvalue(
        &self,
        operator: &PauliHamiltonian,
    ) -> OptResult<MinimumEigensolverResult> {
        ensure_diagonal(operator)?;
        let n = operator.num_qubits();
        if n > MAX_EXACT_QUBITS {
            return Err(OptError::InvalidProblem(format!(
                "exact diagonalization limited to {MAX_EXACT_QUBITS} qubits, operator has {n}"
            )));
        }

        let (basis, eigenvalue) = (0u64..1 << n)
            .map(|b| (b, operator.diagonal_value(b)))
            .fold((0, f64::INFINITY), |best, cur| {
                if cur.1 < best.1 { cur } else { best }
            });
        debug!(num_qubits = n, eigenvalue, "exact minimum found");

        Ok(MinimumEigensolverResult {
            eigenvalue,
            eigenstate: Distribution::from_probabilities(n, [(basis, 1.0)]),
            optimal_parameters: Vec::new(),
            optimizer_evals: 0,
            optimizer_iterations: 0,
            energy_history: Vec::new(),
        })
    }
}
