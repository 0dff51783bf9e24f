//! Grover adaptive search for QUBO minimization.
//!
//! Follows Dürr and Høyer: keep a threshold, amplify the keys whose value
//! lies below it, measure, and tighten the threshold whenever a better key
//! turns up. Objective values live in a `num_value_qubits`-bit two's
//! complement register, so values outside its range wrap around exactly as
//! they would on the device.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;
use tracing::{debug, info, instrument, trace};

use knapq_hal::{HalError, QuantumInstance};
use knapq_ir::PhaseOracle;

use super::result::{
    OptimizationAlgorithm, OptimizationResult, OptimizationStatus, SolutionSample,
};
use crate::circuits::grover_circuit;
use crate::converters::{QuadraticProgramConverter, QuadraticProgramToQubo};
use crate::error::{OptError, OptResult};
use crate::problems::QuadraticProgram;

/// Integer QUBO in minimization form.
#[derive(Debug, Clone)]
struct QuboTable {
    constant: i64,
    linear: Array1<i64>,
    /// Strictly upper-triangular couplings.
    quadratic: Array2<i64>,
}

fn integral(term: String, value: f64) -> OptResult<i64> {
    if value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
        return Err(OptError::NonIntegerCoefficient { term, value });
    }
    Ok(value as i64)
}

impl QuboTable {
    fn new(qubo: &QuadraticProgram) -> OptResult<Self> {
        let n = qubo.num_vars();
        let objective = qubo.objective();
        let sign = objective.sense.sign();
        let name = |i: usize| qubo.variables()[i].name.clone();

        let constant = integral("constant".to_string(), sign * objective.constant)?;
        let mut linear = Array1::<i64>::zeros(n);
        let mut quadratic = Array2::<i64>::zeros((n, n));
        for (&i, &a) in &objective.linear {
            linear[i] += integral(name(i), sign * a)?;
        }
        for (&(i, j), &q) in &objective.quadratic {
            let value = integral(format!("{}*{}", name(i), name(j)), sign * q)?;
            if i == j {
                linear[i] += value;
            } else {
                quadratic[[i, j]] += value;
            }
        }
        Ok(Self {
            constant,
            linear,
            quadratic,
        })
    }

    fn num_keys(&self) -> usize {
        self.linear.len()
    }

    /// Objective value of `key`, where bit `i` is variable `i`.
    fn value(&self, key: u64) -> i128 {
        let n = self.num_keys();
        let bit = |i: usize| (key >> i) & 1 == 1;
        let mut total = i128::from(self.constant);
        for i in (0..n).filter(|&i| bit(i)) {
            total += i128::from(self.linear[i]);
            for j in (i + 1..n).filter(|&j| bit(j)) {
                total += i128::from(self.quadratic[[i, j]]);
            }
        }
        total
    }

    /// Oracle marking every key whose register value, shifted by `threshold`,
    /// reads negative.
    fn oracle(&self, num_value_qubits: usize, threshold: i128) -> OptResult<PhaseOracle> {
        let n = self.num_keys();
        let marked = (0..1u64 << n)
            .map(|key| wrap(self.value(key) - threshold, num_value_qubits) < 0)
            .collect();
        Ok(PhaseOracle::new(n, marked)?)
    }
}

/// Reduce `value` to a `bits`-bit two's complement integer.
fn wrap(value: i128, bits: usize) -> i128 {
    let modulus = 1i128 << bits;
    let r = value.rem_euclid(modulus);
    if r >= modulus / 2 { r - modulus } else { r }
}

/// Outcome of a Grover search, including its circuit statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroverOptimizationResult {
    pub result: OptimizationResult,
    /// Gate counts of every circuit executed, in execution order.
    pub operation_counts: Vec<BTreeMap<String, usize>>,
    pub n_input_qubits: usize,
    pub n_output_qubits: usize,
    /// QUBO objective at the optimum key.
    pub intermediate_fval: f64,
    /// Final threshold, in minimization form.
    pub threshold: f64,
    /// Total Grover rotations applied across all circuits.
    pub rotations: usize,
}

/// Grover adaptive search over the QUBO form of a program.
#[derive(Debug, Clone)]
pub struct GroverOptimizer {
    num_value_qubits: usize,
    num_iterations: usize,
    instance: QuantumInstance,
    seed: Option<u64>,
    penalty: Option<f64>,
}

impl GroverOptimizer {
    /// `num_iterations` is how many consecutive non-improving measurements
    /// end the search.
    pub fn new(num_value_qubits: usize, num_iterations: usize, instance: QuantumInstance) -> Self {
        Self {
            num_value_qubits,
            num_iterations,
            instance,
            seed: None,
            penalty: None,
        }
    }

    /// Seed for rotation counts and for sampling exact distributions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_penalty(mut self, penalty: Option<f64>) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn num_value_qubits(&self) -> usize {
        self.num_value_qubits
    }

    pub fn num_iterations(&self) -> usize {
        self.num_iterations
    }

    /// Run the search and keep the per-circuit statistics.
    #[instrument(skip_all, fields(problem = problem.name(), value_qubits = self.num_value_qubits))]
    pub fn run(&self, problem: &QuadraticProgram) -> OptResult<GroverOptimizationResult> {
        if self.num_value_qubits == 0 || self.num_value_qubits > 64 {
            return Err(OptError::InvalidProblem(format!(
                "value register needs between 1 and 64 qubits, got {}",
                self.num_value_qubits
            )));
        }
        if self.num_iterations == 0 {
            return Err(OptError::InvalidProblem(
                "num_iterations must be at least 1".to_string(),
            ));
        }

        let mut converter = QuadraticProgramToQubo::new().with_penalty(self.penalty);
        let qubo = converter.convert(problem)?;
        let n_key = qubo.num_vars();
        let n_value = self.num_value_qubits;
        self.instance.check(n_key)?;
        let table = QuboTable::new(&qubo)?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let num_solutions = 1usize << n_key;
        let max_rotations = (100.0 * PI / 4.0).ceil() as usize;
        let max_m = 2f64.powf(n_key as f64 / 2.0);

        let mut threshold: i128 = 0;
        let mut optimum: Option<(u64, i128)> = None;
        let mut keys_measured = BTreeSet::new();
        let mut operation_counts = Vec::new();
        let mut rotations = 0usize;
        let mut optimum_found = false;

        while !optimum_found {
            let mut m = 1usize;
            let mut improved = false;
            let mut loops_without_improvement = 0;
            let oracle = table.oracle(n_value, threshold)?;
            trace!(threshold = %threshold, marked = oracle.num_marked(), "built oracle");

            while !improved {
                loops_without_improvement += 1;
                let rotation_count = rng.gen_range(0..m);
                rotations += rotation_count;

                let mut circuit = grover_circuit(n_key, &oracle, rotation_count)?;
                circuit.measure_all()?;
                let distribution = self.instance.execute(&circuit)?;
                let key = distribution.sample(&mut rng).ok_or_else(|| {
                    HalError::Execution("execution returned no outcomes".to_string())
                })?;
                let value = wrap(table.value(key) - threshold, n_value) + threshold;
                debug!(key, value = %value, rotation_count, "measured outcome");

                if optimum.is_none_or(|(_, best)| value < best) {
                    optimum = Some((key, value));
                    threshold = value;
                    improved = true;
                    debug!(key, threshold = %threshold, "improved threshold");
                } else {
                    m = (m as f64 * 8.0 / 7.0).min(max_m).ceil() as usize;
                    keys_measured.insert(key);
                    if loops_without_improvement >= self.num_iterations
                        || keys_measured.len() == num_solutions
                        || rotations >= max_rotations
                    {
                        improved = true;
                        optimum_found = true;
                    }
                }

                operation_counts.push(
                    circuit
                        .count_ops()
                        .into_iter()
                        .map(|(name, count)| (name.to_string(), count))
                        .collect(),
                );
            }
        }

        let (mut key, best) = optimum.unwrap_or((0, 0));
        if best >= 0 && table.constant == 0 {
            // Nothing negative was ever seen, so zero is the best guess.
            key = 0;
        }

        let bits: Vec<f64> = (0..n_key).map(|i| ((key >> i) & 1) as f64).collect();
        let intermediate_fval = qubo.objective_value(&bits)?;
        let x = converter.interpret(&bits)?;
        let fval = problem.objective_value(&x)?;
        let status = if problem.is_feasible(&x) {
            OptimizationStatus::Success
        } else {
            OptimizationStatus::Infeasible
        };
        info!(
            fval,
            %status,
            circuits = operation_counts.len(),
            rotations,
            "Grover search finished"
        );

        let result = OptimizationResult::from_samples(
            problem,
            vec![SolutionSample {
                x,
                fval,
                probability: 1.0,
                status,
            }],
        );
        Ok(GroverOptimizationResult {
            result,
            operation_counts,
            n_input_qubits: n_key,
            n_output_qubits: n_value,
            intermediate_fval,
            threshold: threshold as f64,
            rotations,
        })
    }
}

impl OptimizationAlgorithm for GroverOptimizer {
    fn solve(&self, problem: &QuadraticProgram) -> OptResult<OptimizationResult> {
        Ok(self.run(problem)?.result)
    }
}
