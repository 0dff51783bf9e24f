//! Solve a quadratic program through a minimum eigensolver.

use tracing::{debug, instrument};

use super::minimum_eigensolver::MinimumEigensolver;
use super::result::{OptimizationAlgorithm, OptimizationResult, decode_samples};
use crate::converters::{QuadraticProgramConverter, QuadraticProgramToQubo};
use crate::error::OptResult;
use crate::problems::QuadraticProgram;
use crate::translators::to_ising;

/// Converts the program to a QUBO, maps it onto an Ising operator, asks the
/// eigensolver for its ground state and decodes every measured outcome back
/// onto the original variables.
#[derive(Debug, Clone)]
pub struct MinimumEigenOptimizer<S> {
    solver: S,
    penalty: Option<f64>,
}

impl<S: MinimumEigensolver> MinimumEigenOptimizer<S> {
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            penalty: None,
        }
    }

    /// Penalty factor for the QUBO conversion; derived automatically if unset.
    pub fn with_penalty(mut self, penalty: Option<f64>) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }
}

impl<S: MinimumEigensolver> OptimizationAlgorithm for MinimumEigenOptimizer<S> {
    #[instrument(skip_all, fields(problem = problem.name(), num_vars = problem.num_vars()))]
    fn solve(&self, problem: &QuadraticProgram) -> OptResult<OptimizationResult> {
        let mut converter = QuadraticProgramToQubo::new().with_penalty(self.penalty);
        let qubo = converter.convert(problem)?;
        let (operator, offset) = to_ising(&qubo)?;

        let eigen = self.solver.compute_minimum_eigenvalue(&operator)?;
        let samples = decode_samples(problem, &eigen.eigenstate, qubo.num_vars(), |y| {
            converter.interpret(y)
        })?;
        let result = OptimizationResult::from_samples(problem, samples);
        debug!(
            energy = eigen.eigenvalue + offset,
            fval = result.fval,
            status = %result.status,
            "minimum eigen optimization finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{ExactEigensolver, OptimizationStatus, Qaoa, Vqe};
    use crate::optimizers::Cobyla;
    use crate::problems::Knapsack;
    use knapq_adapter_sim::SimBackend;
    use knapq_hal::QuantumInstance;
    use std::sync::Arc;

    fn knapsack() -> Knapsack {
        Knapsack::new(vec![3, 4, 5], vec![2, 3, 4], 5).unwrap()
    }

    fn single_shot() -> QuantumInstance {
        QuantumInstance::new(Arc::new(SimBackend::new()))
            .with_shots(1)
            .with_seed_simulator(10)
    }

    #[test]
    fn test_exact_solves_knapsack() {
        let qp = knapsack().to_quadratic_program().unwrap();
        let result = MinimumEigenOptimizer::new(ExactEigensolver::new())
            .solve(&qp)
            .unwrap();
        assert_eq!(result.status, OptimizationStatus::Success);
        assert_eq!(result.fval, 7.0);
        assert_eq!(knapsack().interpret(&result.x), vec![0, 1]);
        assert_eq!(result.variable_names, vec!["x_0", "x_1", "x_2"]);
    }

    #[test]
    fn test_qaoa_single_shot() {
        let qp = knapsack().to_quadratic_program().unwrap();
        let qaoa = Qaoa::new(Cobyla::new().with_maxiter(1), single_shot());
        let result = MinimumEigenOptimizer::new(qaoa).solve(&qp).unwrap();
        assert_eq!(result.x.len(), 3);
        assert_eq!(result.samples.len(), 1);
        assert_ne!(result.status, OptimizationStatus::Failure);
    }

    #[test]
    fn test_vqe_single_shot() {
        let qp = knapsack().to_quadratic_program().unwrap();
        let vqe = Vqe::new(Cobyla::new().with_maxiter(1), single_shot()).with_seed(10);
        let a = MinimumEigenOptimizer::new(vqe.clone()).solve(&qp).unwrap();
        let b = MinimumEigenOptimizer::new(vqe).solve(&qp).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_conversion_errors_propagate() {
        let mut qp = QuadraticProgram::new("frac");
        let x = qp.binary_var("x").unwrap();
        qp.add_linear_constraint("c", [(x, 0.5)], crate::problems::ConstraintSense::Le, 1.0)
            .unwrap();
        assert!(
            MinimumEigenOptimizer::new(ExactEigensolver::new())
                .solve(&qp)
                .is_err()
        );
    }
}
