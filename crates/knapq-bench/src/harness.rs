//! The knapsack benchmark harness.
//!
//! [`KnapsackBenchmarks::setup`] builds everything one grid point needs; the
//! four operations then each construct their solver from scratch and run it
//! once. Operations borrow the harness immutably, so they can run in any
//! order without observing each other.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use knapq_adapter_sim::SimBackend;
use knapq_hal::{Backend, QuantumInstance};
use knapq_opt::{
    Cobyla, EfficientSu2, GroverOptimizationResult, GroverOptimizer, Knapsack,
    MinimumEigenOptimizer, OptimizationAlgorithm, OptimizationResult, Qaoa,
    QuadraticProgram, QuadraticProgramConverter, QuadraticProgramToQubo, Vqe,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{BenchParams, HarnessConfig};
use crate::error::{BenchError, BenchResult};
use crate::instance::ProblemInstance;

/// The timed operations of the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GenerateQubo,
    Qaoa,
    Vqe,
    Grover,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::GenerateQubo,
        Operation::Qaoa,
        Operation::Vqe,
        Operation::Grover,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::GenerateQubo => "generate_qubo",
            Operation::Qaoa => "qaoa",
            Operation::Vqe => "vqe",
            Operation::Grover => "grover",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| BenchError::InvalidParams(format!("unknown operation '{s}'")))
    }
}

/// What an operation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutput {
    Qubo(QuadraticProgram),
    Solution(OptimizationResult),
}

/// Shared state for one parameter combination.
#[derive(Debug, Clone)]
pub struct KnapsackBenchmarks {
    params: BenchParams,
    config: HarnessConfig,
    instance: QuantumInstance,
    problem: ProblemInstance,
    knapsack: Knapsack,
    qp: QuadraticProgram,
}

impl KnapsackBenchmarks {
    /// Set up on the statevector simulator.
    pub fn setup(params: BenchParams, config: &HarnessConfig) -> BenchResult<Self> {
        Self::setup_with_backend(params, config, Arc::new(SimBackend::new()))
    }

    #[instrument(skip(config, backend), fields(backend = backend.name()))]
    pub fn setup_with_backend(
        params: BenchParams,
        config: &HarnessConfig,
        backend: Arc<dyn Backend>,
    ) -> BenchResult<Self> {
        config.validate()?;
        params.validate()?;
        if !backend.is_available() {
            return Err(BenchError::BackendUnavailable(backend.name().to_string()));
        }

        let instance = QuantumInstance::new(backend)
            .with_shots(config.shots)
            .with_seed_simulator(config.simulator_seed);
        let mut rng = StdRng::seed_from_u64(config.problem_seed);
        let problem = ProblemInstance::generate(params, &mut rng)?;
        let knapsack = problem.to_knapsack()?;
        let qp = knapsack.to_quadratic_program()?;
        info!(
            values = ?problem.values,
            weights = ?problem.weights,
            max_weight = problem.max_weight,
            "benchmark instance ready"
        );

        Ok(Self {
            params,
            config: config.clone(),
            instance,
            problem,
            knapsack,
            qp,
        })
    }

    /// Grid points where setup and one warm-up run of `operation` succeed.
    ///
    /// Failing points are logged and left out, so a timing loop only ever
    /// sees operations that complete.
    pub fn measurable_cases(
        grid: &[BenchParams],
        operation: Operation,
        config: &HarnessConfig,
        backend: Arc<dyn Backend>,
    ) -> Vec<Self> {
        grid.iter()
            .filter_map(|&params| {
                let bench = match Self::setup_with_backend(params, config, backend.clone()) {
                    Ok(bench) => bench,
                    Err(e) => {
                        warn!(%operation, %params, error = %e, "setup failed, skipping");
                        return None;
                    }
                };
                if let Err(e) = bench.run(operation) {
                    warn!(%operation, %params, error = %e, "operation failed, skipping");
                    return None;
                }
                Some(bench)
            })
            .collect()
    }

    pub fn params(&self) -> BenchParams {
        self.params
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn quantum_instance(&self) -> &QuantumInstance {
        &self.instance
    }

    pub fn problem(&self) -> &ProblemInstance {
        &self.problem
    }

    pub fn knapsack(&self) -> &Knapsack {
        &self.knapsack
    }

    pub fn quadratic_program(&self) -> &QuadraticProgram {
        &self.qp
    }

    /// Rebuild the program from the knapsack and convert it to a QUBO.
    pub fn generate_qubo(&self) -> BenchResult<QuadraticProgram> {
        let qp = self.knapsack.to_quadratic_program()?;
        let qubo = QuadraticProgramToQubo::new().convert(&qp)?;
        debug!(num_vars = qubo.num_vars(), "generated QUBO");
        Ok(qubo)
    }

    pub fn solve_qaoa(&self) -> BenchResult<OptimizationResult> {
        let optimizer = Cobyla::new().with_maxiter(self.config.optimizer_maxiter);
        let qaoa = Qaoa::new(optimizer, self.instance.clone());
        Ok(MinimumEigenOptimizer::new(qaoa).solve(&self.qp)?)
    }

    pub fn solve_vqe(&self) -> BenchResult<OptimizationResult> {
        let optimizer = Cobyla::new().with_maxiter(self.config.optimizer_maxiter);
        let vqe = Vqe::new(optimizer, self.instance.clone())
            .with_ansatz(EfficientSu2::new())
            .with_seed(self.config.algorithm_seed);
        Ok(MinimumEigenOptimizer::new(vqe).solve(&self.qp)?)
    }

    /// Grover search with one value qubit per decision variable.
    pub fn solve_grover(&self) -> BenchResult<GroverOptimizationResult> {
        let grover = GroverOptimizer::new(
            self.qp.num_vars(),
            self.config.grover_iterations,
            self.instance.clone(),
        )
        .with_seed(self.config.algorithm_seed);
        Ok(grover.run(&self.qp)?)
    }

    pub fn run(&self, operation: Operation) -> BenchResult<OperationOutput> {
        match operation {
            Operation::GenerateQubo => self.generate_qubo().map(OperationOutput::Qubo),
            Operation::Qaoa => self.solve_qaoa().map(OperationOutput::Solution),
            Operation::Vqe => self.solve_vqe().map(OperationOutput::Solution),
            Operation::Grover => self
                .solve_grover()
                .map(|run| OperationOutput::Solution(run.result)),
        }
    }
}
