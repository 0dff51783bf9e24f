//! Solver results shared by every optimization algorithm.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use knapq_hal::Distribution;

use crate::error::OptResult;
use crate::problems::QuadraticProgram;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationStatus {
    /// The solution satisfies every constraint.
    Success,
    /// The best solution found violates a constraint or bound.
    Infeasible,
    /// No solution was produced.
    Failure,
}

impl fmt::Display for OptimizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OptimizationStatus::Success => "SUCCESS",
            OptimizationStatus::Infeasible => "INFEASIBLE",
            OptimizationStatus::Failure => "FAILURE",
        };
        f.write_str(s)
    }
}

/// One candidate solution in the variables of the original program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionSample {
    pub x: Vec<f64>,
    pub fval: f64,
    pub probability: f64,
    pub status: OptimizationStatus,
}

/// Best solution found plus every sample it was chosen from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub x: Vec<f64>,
    pub fval: f64,
    pub variable_names: Vec<String>,
    pub status: OptimizationStatus,
    pub samples: Vec<SolutionSample>,
}

impl OptimizationResult {
    /// Rank `samples` and take the first as the solution.
    ///
    /// Feasible samples come first, then better objective values under the
    /// program's sense, then higher probability. Without samples the result
    /// is the all-zero assignment with status [`OptimizationStatus::Failure`].
    pub fn from_samples(problem: &QuadraticProgram, mut samples: Vec<SolutionSample>) -> Self {
        let sign = problem.objective().sense.sign();
        samples.sort_by(|a, b| {
            let infeasible_a = a.status != OptimizationStatus::Success;
            let infeasible_b = b.status != OptimizationStatus::Success;
            infeasible_a
                .cmp(&infeasible_b)
                .then_with(|| (sign * a.fval).total_cmp(&(sign * b.fval)))
                .then_with(|| b.probability.total_cmp(&a.probability))
        });

        let variable_names = problem.variables().iter().map(|v| v.name.clone()).collect();
        match samples.first() {
            Some(best) => Self {
                x: best.x.clone(),
                fval: best.fval,
                variable_names,
                status: best.status,
                samples,
            },
            None => {
                let x = vec![0.0; problem.num_vars()];
                Self {
                    fval: problem.objective().evaluate(&x),
                    x,
                    variable_names,
                    status: OptimizationStatus::Failure,
                    samples,
                }
            }
        }
    }

    /// Value of the variable called `name` in the solution.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.variable_names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.x.get(i).copied())
    }
}

impl fmt::Display for OptimizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fval={}", self.fval)?;
        for (name, value) in self.variable_names.iter().zip(&self.x) {
            write!(f, ", {name}={value:.1}")?;
        }
        write!(f, ", status={}", self.status)
    }
}

/// A solver that takes a program and returns its best solution.
pub trait OptimizationAlgorithm {
    fn solve(&self, problem: &QuadraticProgram) -> OptResult<OptimizationResult>;
}

/// Map every measured outcome of a `num_bits`-qubit register back onto the
/// variables of `problem` via `interpret` and score it.
///
/// Bit `k` of an outcome is the value of QUBO variable `k`. Outcomes that
/// decode to the same assignment are merged and their probabilities summed.
pub(crate) fn decode_samples(
    problem: &QuadraticProgram,
    distribution: &Distribution,
    num_bits: usize,
    interpret: impl Fn(&[f64]) -> OptResult<Vec<f64>>,
) -> OptResult<Vec<SolutionSample>> {
    let mut samples: Vec<SolutionSample> = Vec::new();
    let mut seen: BTreeMap<Vec<i64>, usize> = BTreeMap::new();

    for (outcome, probability) in distribution.iter() {
        let bits: Vec<f64> = (0..num_bits)
            .map(|k| ((outcome >> k) & 1) as f64)
            .collect();
        let x = interpret(&bits)?;
        let key: Vec<i64> = x.iter().map(|v| v.round() as i64).collect();
        if let Some(&index) = seen.get(&key) {
            samples[index].probability += probability;
            continue;
        }
        let fval = problem.objective_value(&x)?;
        let status = if problem.is_feasible(&x) {
            OptimizationStatus::Success
        } else {
            OptimizationStatus::Infeasible
        };
        seen.insert(key, samples.len());
        samples.push(SolutionSample {
            x,
            fval,
            probability,
            status,
        });
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::Knapsack;

    fn knapsack_qp() -> QuadraticProgram {
        Knapsack::new(vec![3, 4, 5], vec![2, 3, 4], 5)
            .unwrap()
            .to_quadratic_program()
            .unwrap()
    }

    fn sample(x: [f64; 3], fval: f64, probability: f64, status: OptimizationStatus) -> SolutionSample {
        SolutionSample {
            x: x.to_vec(),
            fval,
            probability,
            status,
        }
    }

    #[test]
    fn test_feasible_ranked_first() {
        let qp = knapsack_qp();
        let result = OptimizationResult::from_samples(
            &qp,
            vec![
                sample([1.0, 1.0, 1.0], 12.0, 0.5, OptimizationStatus::Infeasible),
                sample([0.0, 0.0, 1.0], 5.0, 0.2, OptimizationStatus::Success),
                sample([1.0, 1.0, 0.0], 7.0, 0.1, OptimizationStatus::Success),
            ],
        );
        assert_eq!(result.status, OptimizationStatus::Success);
        assert_eq!(result.fval, 7.0);
        assert_eq!(result.value("x_1"), Some(1.0));
        assert_eq!(result.samples.len(), 3);
        assert_eq!(
            result.to_string(),
            "fval=7, x_0=1.0, x_1=1.0, x_2=0.0, status=SUCCESS"
        );
    }

    #[test]
    fn test_empty_samples_fail() {
        let qp = knapsack_qp();
        let result = OptimizationResult::from_samples(&qp, Vec::new());
        assert_eq!(result.status, OptimizationStatus::Failure);
        assert_eq!(result.x, vec![0.0; 3]);
        assert_eq!(result.fval, 0.0);
    }

    #[test]
    fn test_decode_merges_duplicates() {
        let qp = knapsack_qp();
        // Outcomes differing only in bit 3 decode to the same assignment.
        let dist = Distribution::from_probabilities(4, [(0b0011, 0.25), (0b1011, 0.5), (0b0100, 0.25)]);
        let samples = decode_samples(&qp, &dist, 4, |y| Ok(y[..3].to_vec())).unwrap();

        assert_eq!(samples.len(), 2);
        let merged = samples.iter().find(|s| s.x == vec![1.0, 1.0, 0.0]).unwrap();
        assert!((merged.probability - 0.75).abs() < 1e-12);
        assert_eq!(merged.fval, 7.0);
        assert_eq!(merged.status, OptimizationStatus::Success);
    }

    #[test]
    fn test_decode_flags_infeasible() {
        let qp = knapsack_qp();
        let dist = Distribution::from_probabilities(3, [(0b111, 1.0)]);
        let samples = decode_samples(&qp, &dist, 3, |y| Ok(y.to_vec())).unwrap();
        assert_eq!(samples[0].status, OptimizationStatus::Infeasible);
        assert_eq!(samples[0].fval, 12.0);
    }
}
