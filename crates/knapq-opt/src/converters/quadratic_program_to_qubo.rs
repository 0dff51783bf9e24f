//! The full conversion chain to an unconstrained binary program.

use tracing::debug;

use super::{
    InequalityToEquality, IntegerToBinary, LinearEqualityToPenalty, QuadraticProgramConverter,
    is_integral,
};
use crate::error::OptResult;
use crate::problems::{ConstraintSense, QuadraticProgram};

/// Inequalities to equalities, integers to binaries, then equalities to
/// penalties.
///
/// The result has only binary variables and no constraints. Its variables
/// are the original ones, then the binary expansion of every slack variable.
#[derive(Debug, Clone, Default)]
pub struct QuadraticProgramToQubo {
    inequality: InequalityToEquality,
    integer: IntegerToBinary,
    penalty: LinearEqualityToPenalty,
}

impl QuadraticProgramToQubo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed penalty factor instead of deriving one from the problem.
    pub fn with_penalty(mut self, penalty: Option<f64>) -> Self {
        self.penalty = LinearEqualityToPenalty::new(penalty);
        self
    }

    pub fn penalty(&self) -> Option<f64> {
        self.penalty.penalty()
    }

    /// Why `problem` cannot be converted, if it cannot.
    pub fn compatibility_message(&self, problem: &QuadraticProgram) -> Option<String> {
        problem
            .linear_constraints()
            .iter()
            .find(|c| {
                c.sense != ConstraintSense::Eq
                    && (!is_integral(c.rhs) || c.linear.values().any(|a| !is_integral(*a)))
            })
            .map(|c| {
                format!(
                    "inequality constraint '{}' has non-integral coefficients",
                    c.name
                )
            })
    }

    pub fn is_compatible(&self, problem: &QuadraticProgram) -> bool {
        self.compatibility_message(problem).is_none()
    }
}

impl QuadraticProgramConverter for QuadraticProgramToQubo {
    fn convert(&mut self, problem: &QuadraticProgram) -> OptResult<QuadraticProgram> {
        let equalities = self.inequality.convert(problem)?;
        let binaries = self.integer.convert(&equalities)?;
        let qubo = self.penalty.convert(&binaries)?;
        debug!(
            problem = problem.name(),
            src_vars = problem.num_vars(),
            qubo_vars = qubo.num_vars(),
            penalty = self.penalty.applied_penalty(),
            "converted to QUBO"
        );
        Ok(qubo)
    }

    fn interpret(&self, x: &[f64]) -> OptResult<Vec<f64>> {
        let x = self.penalty.interpret(x)?;
        let x = self.integer.interpret(&x)?;
        self.inequality.interpret(&x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptError;
    use crate::problems::knapsack::arb_knapsack;
    use crate::problems::{Knapsack, ObjSense, VarType};
    use proptest::prelude::*;

    #[test]
    fn test_knapsack_qubo_shape() {
        let qp = Knapsack::new(vec![2, 1], vec![1, 1], 2)
            .unwrap()
            .to_quadratic_program()
            .unwrap();
        let qubo = QuadraticProgramToQubo::new().convert(&qp).unwrap();

        assert!(qubo.is_qubo());
        assert_eq!(qubo.objective().sense, ObjSense::Maximize);
        let names: Vec<&str> = qubo.variables().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["x_0", "x_1", "c0@int_slack@0", "c0@int_slack@1"]);
        assert!(qubo.variables().iter().all(|v| v.vartype == VarType::Binary));
    }

    #[test]
    fn test_qubo_optimum_matches_knapsack_optimum() {
        let knapsack = Knapsack::new(vec![3, 4, 5], vec![2, 3, 4], 5).unwrap();
        let qp = knapsack.to_quadratic_program().unwrap();
        let mut conv = QuadraticProgramToQubo::new();
        let qubo = conv.convert(&qp).unwrap();

        let n = qubo.num_vars();
        let best = (0u64..1 << n)
            .map(|mask| {
                let y: Vec<f64> = (0..n).map(|k| (mask >> k & 1) as f64).collect();
                let v = qubo.objective_value(&y).unwrap();
                (v, y)
            })
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .unwrap();

        let x = conv.interpret(&best.1).unwrap();
        assert!(qp.is_feasible(&x));
        assert_eq!(qp.objective_value(&x).unwrap(), 7.0);
        assert_eq!(knapsack.interpret(&x), vec![0, 1]);
    }

    #[test]
    fn test_fixed_penalty() {
        let qp = Knapsack::new(vec![1], vec![1], 1)
            .unwrap()
            .to_quadratic_program()
            .unwrap();
        let mut conv = QuadraticProgramToQubo::new().with_penalty(Some(3.0));
        assert_eq!(conv.penalty(), Some(3.0));
        let qubo = conv.convert(&qp).unwrap();
        // maximize x - 3 (x + s - 1)^2
        assert_eq!(qubo.objective().constant, -3.0);
    }

    #[test]
    fn test_incompatible_inequality() {
        let mut qp = QuadraticProgram::new("frac");
        let x = qp.binary_var("x").unwrap();
        qp.add_linear_constraint("c", [(x, 1.5)], ConstraintSense::Ge, 1.0)
            .unwrap();
        let mut conv = QuadraticProgramToQubo::new();
        assert!(!conv.is_compatible(&qp));
        assert!(matches!(
            conv.convert(&qp),
            Err(OptError::UnsupportedConstraint(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_feasible_selections_round_trip(knapsack in arb_knapsack()) {
            let qp = knapsack.to_quadratic_program().unwrap();
            let mut conv = QuadraticProgramToQubo::new();
            let qubo = conv.convert(&qp).unwrap();
            let n = knapsack.num_items();
            let num_slack = qubo.num_vars() - n;
            prop_assert!(num_slack > 0);

            for selection in 0u64..1 << n {
                let x: Vec<f64> = (0..n).map(|i| (selection >> i & 1) as f64).collect();
                if !qp.is_feasible(&x) {
                    continue;
                }
                let value = qp.objective_value(&x).unwrap();
                // Exactly the right slack cancels the penalty.
                let encoded = (0u64..1 << num_slack)
                    .map(|slack| {
                        let mut y = x.clone();
                        y.extend((0..num_slack).map(|k| (slack >> k & 1) as f64));
                        y
                    })
                    .find(|y| qubo.objective_value(y).unwrap() == value);
                prop_assert!(encoded.is_some(), "selection {selection:b} has no encoding");
                let y = encoded.unwrap();
                prop_assert_eq!(conv.interpret(&y).unwrap(), x);
            }
        }
    }
}
