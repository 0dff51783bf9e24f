//! Quantum approximate optimization.

use knapq_hal::QuantumInstance;
use tracing::{debug, instrument};

use super::minimum_eigensolver::{
    MinimumEigensolver, MinimumEigensolverResult, ensure_diagonal, estimate_energy,
};
use crate::circuits::qaoa::{initial_parameters, num_parameters, qaoa_ansatz};
use crate::error::{OptError, OptResult};
use crate::optimizers::{Cobyla, Optimizer};
use crate::problems::PauliHamiltonian;

/// QAOA with `reps` cost/mixer layers, tuned by a classical optimizer.
///
/// Parameters are laid out as `[γ_0, .., γ_{p-1}, β_0, .., β_{p-1}]`. Without
/// an explicit initial point the linear-ramp schedule from
/// [`initial_parameters`] is used.
#[derive(Debug, Clone)]
pub struct Qaoa<O = Cobyla> {
    optimizer: O,
    instance: QuantumInstance,
    reps: usize,
    initial_point: Option<Vec<f64>>,
}

impl<O: Optimizer> Qaoa<O> {
    pub fn new(optimizer: O, instance: QuantumInstance) -> Self {
        Self {
            optimizer,
            instance,
            reps: 1,
            initial_point: None,
        }
    }

    pub fn with_reps(mut self, reps: usize) -> Self {
        self.reps = reps;
        self
    }

    pub fn with_initial_point(mut self, point: Vec<f64>) -> Self {
        self.initial_point = Some(point);
        self
    }

    pub fn reps(&self) -> usize {
        self.reps
    }

    pub fn instance(&self) -> &QuantumInstance {
        &self.instance
    }

    fn starting_point(&self) -> OptResult<Vec<f64>> {
        let expected = num_parameters(self.reps);
        match &self.initial_point {
            Some(point) if point.len() != expected => Err(OptError::ParameterCountMismatch {
                expected,
                got: point.len(),
            }),
            Some(point) => Ok(point.clone()),
            None => Ok(initial_parameters(self.reps)),
        }
    }
}

impl<O: Optimizer> MinimumEigensolver for Qaoa<O> {
    #[instrument(skip_all, fields(reps = self.reps, num_qubits = operator.num_qubits()))]
    fn compute_minimum_eigenvalue(
        &self,
        operator: &PauliHamiltonian,
    ) -> OptResult<MinimumEigensolverResult> {
        ensure_diagonal(operator)?;
        self.instance.check(operator.num_qubits())?;
        let p = self.reps;
        let initial = self.starting_point()?;

        let run = self.optimizer.minimize(
            |params| {
                let circuit = qaoa_ansatz(operator, &params[..p], &params[p..])?;
                let (energy, _) = estimate_energy(&self.instance, circuit, operator)?;
                Ok(energy)
            },
            initial,
        )?;

        let params = &run.optimal_params;
        let circuit = qaoa_ansatz(operator, &params[..p], &params[p..])?;
        let (_, eigenstate) = estimate_energy(&self.instance, circuit, operator)?;
        debug!(
            eigenvalue = run.optimal_value,
            evaluations = run.num_evaluations,
            "QAOA finished"
        );

        Ok(MinimumEigensolverResult {
            eigenvalue: run.optimal_value,
            eigenstate,
            optimal_parameters: run.optimal_params,
            optimizer_evals: run.num_evaluations,
            optimizer_iterations: run.num_iterations,
            energy_history: run.history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::PauliTerm;
    use knapq_adapter_sim::SimBackend;
    use std::sync::Arc;

    fn exact_instance() -> QuantumInstance {
        QuantumInstance::new(Arc::new(SimBackend::new())).with_exact_probabilities()
    }

    #[test]
    fn test_single_evaluation_budget() {
        let op = PauliHamiltonian::new(vec![PauliTerm::zz(1.0, 0, 1), PauliTerm::z(0.5, 0)]);
        let instance = QuantumInstance::new(Arc::new(SimBackend::new()))
            .with_shots(1)
            .with_seed_simulator(10);
        let qaoa = Qaoa::new(Cobyla::new().with_maxiter(1), instance);
        let result = qaoa.compute_minimum_eigenvalue(&op).unwrap();

        assert_eq!(result.optimizer_evals, 1);
        assert_eq!(result.optimal_parameters, initial_parameters(1));
        assert_eq!(result.eigenstate.len(), 1);
        assert_eq!(result.energy_history.len(), 1);
    }

    #[test]
    fn test_optimization_lowers_energy() {
        let op = PauliHamiltonian::new(vec![PauliTerm::z(1.0, 0), PauliTerm::z(1.0, 1)]);
        let qaoa = Qaoa::new(Cobyla::new().with_maxiter(200), exact_instance()).with_reps(1);
        let result = qaoa.compute_minimum_eigenvalue(&op).unwrap();
        let start = result.energy_history[0];
        assert!(result.eigenvalue <= start);
        assert!(result.eigenvalue < -1.5);
        assert_eq!(result.eigenstate.most_likely().map(|(b, _)| b), Some(0b11));
    }

    #[test]
    fn test_initial_point_length_checked() {
        let op = PauliHamiltonian::new(vec![PauliTerm::z(1.0, 0)]);
        let qaoa = Qaoa::new(Cobyla::new(), exact_instance())
            .with_reps(2)
            .with_initial_point(vec![0.1, 0.2]);
        assert!(matches!(
            qaoa.compute_minimum_eigenvalue(&op),
            Err(OptError::ParameterCountMismatch { expected: 4, got: 2 })
        ));
    }

    #[test]
    fn test_qubit_limit_surfaces() {
        let op = PauliHamiltonian::new(vec![PauliTerm::z(1.0, 3)]);
        let backend = SimBackend::new().with_max_qubits(2);
        let qaoa = Qaoa::new(
            Cobyla::new(),
            QuantumInstance::new(Arc::new(backend)),
        );
        assert!(matches!(
            qaoa.compute_minimum_eigenvalue(&op),
            Err(OptError::Hal(_))
        ));
    }
}
