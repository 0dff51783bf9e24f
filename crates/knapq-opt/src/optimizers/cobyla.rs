//! Budgeted simplex search in the spirit of COBYLA.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::Optimizer;
use crate::error::OptResult;

/// Outcome of one minimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerResult {
    pub optimal_params: Vec<f64>,
    pub optimal_value: f64,
    pub num_iterations: usize,
    pub num_evaluations: usize,
    /// Objective value of every evaluation, in call order.
    pub history: Vec<f64>,
    pub converged: bool,
}

/// Derivative-free minimizer over an adaptive simplex.
///
/// `maxiter` caps the number of objective evaluations, so `maxiter = 1`
/// evaluates the starting point and returns it. The simplex starts with edge
/// `rhobeg`. Whenever it collapses (its values agree within `tol` or it has
/// contracted to half the current radius) the radius is halved and the
/// simplex is rebuilt around the best vertex. The search converges once a
/// collapse happens at radius `rhoend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cobyla {
    pub maxiter: usize,
    pub tol: f64,
    pub rhobeg: f64,
    pub rhoend: f64,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            maxiter: 1000,
            tol: 1e-6,
            rhobeg: 1.0,
            rhoend: 1e-4,
        }
    }
}

impl Cobyla {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Initial simplex edge length.
    pub fn with_rhobeg(mut self, rhobeg: f64) -> Self {
        self.rhobeg = rhobeg;
        self
    }

    pub fn with_rhoend(mut self, rhoend: f64) -> Self {
        self.rhoend = rhoend;
        self
    }
}

/// Objective wrapper that counts calls against a fixed budget.
struct Budgeted<F> {
    objective: F,
    budget: usize,
    history: Vec<f64>,
}

impl<F: FnMut(&[f64]) -> OptResult<f64>> Budgeted<F> {
    fn exhausted(&self) -> bool {
        self.history.len() >= self.budget
    }

    fn eval(&mut self, x: &[f64]) -> OptResult<f64> {
        let value = (self.objective)(x)?;
        self.history.push(value);
        Ok(value)
    }
}

/// `origin + t · (toward - origin)`.
fn affine(origin: &[f64], toward: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(toward)
        .map(|(o, w)| o + t * (w - o))
        .collect()
}

/// Largest coordinate distance of any vertex from the best one.
fn simplex_size(simplex: &[(Vec<f64>, f64)]) -> f64 {
    let best = &simplex[0].0;
    simplex[1..]
        .iter()
        .flat_map(|(x, _)| x.iter().zip(best).map(|(a, b)| (a - b).abs()))
        .fold(0.0, f64::max)
}

impl Optimizer for Cobyla {
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> OptResult<OptimizerResult>
    where
        F: FnMut(&[f64]) -> OptResult<f64>,
    {
        let n = initial_params.len();
        let mut f = Budgeted {
            objective,
            budget: self.maxiter.max(1),
            history: Vec::new(),
        };

        let f0 = f.eval(&initial_params)?;
        let mut simplex = vec![(initial_params.clone(), f0)];
        let mut rho = self.rhobeg;
        let mut iterations = 0;
        let mut restarts = 0;
        let mut converged = n == 0;

        'stages: while n > 0 {
            // Rebuild around the best vertex with edge length `rho`.
            simplex.truncate(1);
            let origin = simplex[0].0.clone();
            for i in 0..n {
                if f.exhausted() {
                    break 'stages;
                }
                let mut vertex = origin.clone();
                vertex[i] += rho;
                let value = f.eval(&vertex)?;
                simplex.push((vertex, value));
            }

            loop {
                simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
                let spread = simplex[n].1 - simplex[0].1;
                if spread <= self.tol || simplex_size(&simplex) <= 0.5 * rho {
                    if rho <= self.rhoend {
                        converged = true;
                        break 'stages;
                    }
                    rho = (0.5 * rho).max(self.rhoend);
                    restarts += 1;
                    trace!(rho, best = simplex[0].1, "shrinking trust region");
                    continue 'stages;
                }
                if f.exhausted() {
                    break 'stages;
                }
                iterations += 1;

                let centroid: Vec<f64> = (0..n)
                    .map(|j| simplex[..n].iter().map(|(x, _)| x[j]).sum::<f64>() / n as f64)
                    .collect();
                let (worst, f_worst) = simplex[n].clone();

                let reflected = affine(&centroid, &worst, -1.0);
                let f_reflected = f.eval(&reflected)?;

                if f_reflected < simplex[0].1 {
                    simplex[n] = (reflected, f_reflected);
                    if !f.exhausted() {
                        let expanded = affine(&centroid, &worst, -2.0);
                        let f_expanded = f.eval(&expanded)?;
                        if f_expanded < f_reflected {
                            simplex[n] = (expanded, f_expanded);
                        }
                    }
                } else if f_reflected < simplex[n - 1].1 {
                    simplex[n] = (reflected, f_reflected);
                } else {
                    if f.exhausted() {
                        break 'stages;
                    }
                    let contracted = affine(&centroid, &worst, 0.5);
                    let f_contracted = f.eval(&contracted)?;
                    if f_contracted < f_worst {
                        simplex[n] = (contracted, f_contracted);
                    } else {
                        let best = simplex[0].0.clone();
                        for vertex in simplex.iter_mut().skip(1) {
                            if f.exhausted() {
                                break;
                            }
                            let shrunk = affine(&best, &vertex.0, 0.5);
                            let value = f.eval(&shrunk)?;
                            *vertex = (shrunk, value);
                        }
                    }
                }
            }
        }

        let (optimal_params, optimal_value) = simplex
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((initial_params, f0));
        debug!(
            evaluations = f.history.len(),
            iterations,
            restarts,
            optimal_value,
            converged,
            "COBYLA finished"
        );

        Ok(OptimizerResult {
            optimal_params,
            optimal_value,
            num_iterations: iterations,
            num_evaluations: f.history.len(),
            history: f.history,
            converged,
        })
    }
}
