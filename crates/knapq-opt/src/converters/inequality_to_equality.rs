//! Turn inequality constraints into equalities with integer slack variables.

use tracing::debug;

use super::{QuadraticProgramConverter, copy_variables, is_integral};
use crate::error::{OptError, OptResult};
use crate::problems::{ConstraintSense, QuadraticProgram};

/// Rewrites `a·x <= b` as `a·x + s = b` and `a·x >= b` as `a·x - s = b`.
///
/// The slack `s` is an integer variable named `<constraint>@int_slack` with
/// bounds `[0, b - min(a·x)]` (resp. `[0, max(a·x) - b]`). When that bound is
/// not positive the constraint becomes a plain equality. Slack variables are
/// appended after all original variables.
#[derive(Debug, Clone, Default)]
pub struct InequalityToEquality {
    src_num_vars: Option<usize>,
}

impl InequalityToEquality {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuadraticProgramConverter for InequalityToEquality {
    fn convert(&mut self, problem: &QuadraticProgram) -> OptResult<QuadraticProgram> {
        let mut dst = copy_variables(problem)?;
        dst.set_objective(problem.objective().clone())?;

        for constraint in problem.linear_constraints() {
            let mut row: Vec<(usize, f64)> =
                constraint.linear.iter().map(|(i, a)| (*i, *a)).collect();

            let slack_sign = match constraint.sense {
                ConstraintSense::Eq => {
                    dst.add_linear_constraint(
                        constraint.name.clone(),
                        row,
                        ConstraintSense::Eq,
                        constraint.rhs,
                    )?;
                    continue;
                }
                ConstraintSense::Le => 1.0,
                ConstraintSense::Ge => -1.0,
            };

            if !is_integral(constraint.rhs) || constraint.linear.values().any(|a| !is_integral(*a)) {
                return Err(OptError::UnsupportedConstraint(format!(
                    "constraint '{}' has non-integral coefficients and would need a continuous slack variable",
                    constraint.name
                )));
            }

            let (mut lhs_min, mut lhs_max) = (0.0, 0.0);
            for (&i, &a) in &constraint.linear {
                let var = &problem.variables()[i];
                let (lb, ub) = (var.lowerbound as f64, var.upperbound as f64);
                if a > 0.0 {
                    lhs_min += a * lb;
                    lhs_max += a * ub;
                } else {
                    lhs_min += a * ub;
                    lhs_max += a * lb;
                }
            }
            let slack_ub = match constraint.sense {
                ConstraintSense::Le => constraint.rhs - lhs_min,
                _ => lhs_max - constraint.rhs,
            };

            if slack_ub > 0.0 {
                let slack =
                    dst.integer_var(format!("{}@int_slack", constraint.name), 0, slack_ub as i64)?;
                row.push((slack, slack_sign));
                debug!(
                    constraint = %constraint.name,
                    upper_bound = slack_ub,
                    "added integer slack variable"
                );
            }
            dst.add_linear_constraint(
                constraint.name.clone(),
                row,
                ConstraintSense::Eq,
                constraint.rhs,
            )?;
        }

        self.src_num_vars = Some(problem.num_vars());
        Ok(dst)
    }

    fn interpret(&self, x: &[f64]) -> OptResult<Vec<f64>> {
        let n = self
            .src_num_vars
            .ok_or(OptError::NotConverted("InequalityToEquality"))?;
        if x.len() < n {
            return Err(OptError::DimensionMismatch {
                expected: n,
                got: x.len(),
            });
        }
        Ok(x[..n].to_vec())
    }
}
