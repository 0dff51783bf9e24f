//! Linear equality constraints to quadratic penalty terms.

use tracing::{debug, warn};

use super::{QuadraticProgramConverter, copy_variables, is_integral};
use crate::error::{OptError, OptResult};
use crate::problems::{ConstraintSense, QuadraticProgram, Variable};

/// Penalty used when a constraint has fractional coefficients, so a penalty
/// derived from the objective spread may not separate feasible points.
pub const DEFAULT_PENALTY: f64 = 1e5;

/// Moves every `a·x = b` into the objective as `± P (a·x - b)^2`.
///
/// The sign follows the objective sense so the penalty always works against
/// the optimizer. Without an explicit factor, `P` is one more than the spread
/// of the objective over the variable bounds, which makes any violated
/// constraint cost more than the best achievable objective gain.
#[derive(Debug, Clone, Default)]
pub struct LinearEqualityToPenalty {
    penalty: Option<f64>,
    applied: Option<f64>,
    src_num_vars: Option<usize>,
}

impl LinearEqualityToPenalty {
    pub fn new(penalty: Option<f64>) -> Self {
        Self {
            penalty,
            ..Self::default()
        }
    }

    /// Explicit penalty factor, if one was configured.
    pub fn penalty(&self) -> Option<f64> {
        self.penalty
    }

    /// Factor used by the last conversion.
    pub fn applied_penalty(&self) -> Option<f64> {
        self.applied
    }

    fn auto_penalty(problem: &QuadraticProgram) -> f64 {
        let mut constraint_terms = problem
            .linear_constraints()
            .iter()
            .flat_map(|c| std::iter::once(c.rhs).chain(c.linear.values().copied()));
        if !constraint_terms.all(is_integral) {
            warn!(
                penalty = DEFAULT_PENALTY,
                "constraints have fractional coefficients, using default penalty"
            );
            return DEFAULT_PENALTY;
        }

        let objective = problem.objective();
        let vars = problem.variables();
        let (mut lin_lo, mut lin_hi) = (0.0, 0.0);
        for (&i, &a) in &objective.linear {
            let (lo, hi) = scaled(a, vars[i].lowerbound as f64, vars[i].upperbound as f64);
            lin_lo += lo;
            lin_hi += hi;
        }
        let (mut quad_lo, mut quad_hi) = (0.0, 0.0);
        for (&(i, j), &q) in &objective.quadratic {
            let (lo, hi) = product_bounds(&vars[i], &vars[j], i == j);
            let (lo, hi) = scaled(q, lo, hi);
            quad_lo += lo;
            quad_hi += hi;
        }
        1.0 + (lin_hi - lin_lo) + (quad_hi - quad_lo)
    }
}

/// Bounds of `coef · v` for `v ∈ [lo, hi]`.
fn scaled(coef: f64, lo: f64, hi: f64) -> (f64, f64) {
    let (a, b) = (coef * lo, coef * hi);
    (a.min(b), a.max(b))
}

/// Bounds of `x_i · x_j`, or of `x_i^2` when `square` is set.
fn product_bounds(vi: &Variable, vj: &Variable, square: bool) -> (f64, f64) {
    let (li, ui) = (vi.lowerbound as f64, vi.upperbound as f64);
    if square {
        let hi = (li * li).max(ui * ui);
        let lo = if li <= 0.0 && ui >= 0.0 {
            0.0
        } else {
            (li * li).min(ui * ui)
        };
        return (lo, hi);
    }
    let (lj, uj) = (vj.lowerbound as f64, vj.upperbound as f64);
    let corners = [li * lj, li * uj, ui * lj, ui * uj];
    let lo = corners.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = corners.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (lo, hi)
}

impl QuadraticProgramConverter for LinearEqualityToPenalty {
    fn convert(&mut self, problem: &QuadraticProgram) -> OptResult<QuadraticProgram> {
        if let Some(c) = problem
            .linear_constraints()
            .iter()
            .find(|c| c.sense != ConstraintSense::Eq)
        {
            return Err(OptError::UnsupportedConstraint(format!(
                "constraint '{}' uses '{}'; only equality constraints can be penalized",
                c.name, c.sense
            )));
        }

        let penalty = self
            .penalty
            .unwrap_or_else(|| Self::auto_penalty(problem));
        let mut objective = problem.objective().clone();
        let weight = objective.sense.sign() * penalty;

        for constraint in problem.linear_constraints() {
            let b = constraint.rhs;
            objective.constant += weight * b * b;
            for (&j, &a) in &constraint.linear {
                objective.add_linear(j, weight * -2.0 * a * b);
            }
            for (&j, &aj) in &constraint.linear {
                for (&k, &ak) in &constraint.linear {
                    objective.add_quadratic(j, k, weight * aj * ak);
                }
            }
        }
        debug!(
            penalty,
            constraints = problem.linear_constraints().len(),
            "penalized equality constraints"
        );

        let mut dst = copy_variables(problem)?;
        dst.set_objective(objective)?;
        self.applied = Some(penalty);
        self.src_num_vars = Some(problem.num_vars());
        Ok(dst)
    }

    fn interpret(&self, x: &[f64]) -> OptResult<Vec<f64>> {
        let n = self
            .src_num_vars
            .ok_or(OptError::NotConverted("LinearEqualityToPenalty"))?;
        if x.len() != n {
            return Err(OptError::DimensionMismatch {
                expected: n,
                got: x.len(),
            });
        }
        Ok(x.to_vec())
    }
}
