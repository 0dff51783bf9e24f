//! The 0/1 knapsack application.

use serde::{Deserialize, Serialize};

use super::quadratic_program::{ConstraintSense, QuadraticProgram};
use crate::error::{OptError, OptResult};

/// Choose items maximizing total value without exceeding `max_weight`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Knapsack {
    values: Vec<u64>,
    weights: Vec<u64>,
    max_weight: u64,
}

impl Knapsack {
    pub fn new(values: Vec<u64>, weights: Vec<u64>, max_weight: u64) -> OptResult<Self> {
        if values.len() != weights.len() {
            return Err(OptError::InvalidProblem(format!(
                "knapsack has {} values but {} weights",
                values.len(),
                weights.len()
            )));
        }
        Ok(Self {
            values,
            weights,
            max_weight,
        })
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    pub fn max_weight(&self) -> u64 {
        self.max_weight
    }

    pub fn num_items(&self) -> usize {
        self.values.len()
    }

    /// Maximize `Σ v_i x_i` subject to `Σ w_i x_i <= max_weight`, with one
    /// binary variable `x_i` per item.
    pub fn to_quadratic_program(&self) -> OptResult<QuadraticProgram> {
        let mut qp = QuadraticProgram::new("Knapsack");
        let vars = (0..self.num_items())
            .map(|i| qp.binary_var(format!("x_{i}")))
            .collect::<OptResult<Vec<_>>>()?;

        qp.maximize(
            0.0,
            vars.iter().zip(&self.values).map(|(&i, &v)| (i, v as f64)),
            [],
        )?;
        qp.add_linear_constraint(
            "c0",
            vars.iter().zip(&self.weights).map(|(&i, &w)| (i, w as f64)),
            ConstraintSense::Le,
            self.max_weight as f64,
        )?;
        Ok(qp)
    }

    /// Indices of the items selected by `x`.
    pub fn interpret(&self, x: &[f64]) -> Vec<usize> {
        x.iter()
            .take(self.num_items())
            .enumerate()
            .filter(|(_, v)| **v >= 0.5)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn total_value(&self, items: &[usize]) -> u64 {
        items.iter().filter_map(|&i| self.values.get(i)).sum()
    }

    pub fn total_weight(&self, items: &[usize]) -> u64 {
        items.iter().filter_map(|&i| self.weights.get(i)).sum()
    }
}

/// Small random knapsacks: up to three items, values, weights and capacity
/// in `[1, 8]`.
#[cfg(test)]
pub(crate) fn arb_knapsack() -> impl proptest::strategy::Strategy<Value = Knapsack> {
    use proptest::prelude::*;

    (1usize..=3, 1u64..=8)
        .prop_flat_map(|(n, cap)| {
            (
                proptest::collection::vec(1u64..=8, n),
                proptest::collection::vec(1u64..=8, n),
                Just(cap),
            )
        })
        .prop_map(|(values, weights, cap)| Knapsack {
            values,
            weights,
            max_weight: cap,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::ObjSense;

    #[test]
    fn test_mismatched_lengths() {
        assert!(Knapsack::new(vec![1, 2], vec![1], 3).is_err());
    }

    #[test]
    fn test_to_quadratic_program() {
        let knapsack = Knapsack::new(vec![3, 4, 5], vec![2, 3, 4], 5).unwrap();
        let qp = knapsack.to_quadratic_program().unwrap();

        assert_eq!(qp.num_vars(), 3);
        assert_eq!(qp.num_binary_vars(), 3);
        assert_eq!(qp.variables()[2].name, "x_2");
        assert_eq!(qp.objective().sense, ObjSense::Maximize);
        assert_eq!(qp.objective().linear_coefficient(1), 4.0);

        let c = &qp.linear_constraints()[0];
        assert_eq!(c.name, "c0");
        assert_eq!(c.sense, ConstraintSense::Le);
        assert_eq!(c.rhs, 5.0);
        assert_eq!(c.linear[&2], 4.0);
    }

    #[test]
    fn test_interpret() {
        let knapsack = Knapsack::new(vec![3, 4, 5], vec![2, 3, 4], 5).unwrap();
        let items = knapsack.interpret(&[1.0, 1.0, 0.0]);
        assert_eq!(items, vec![0, 1]);
        assert_eq!(knapsack.total_value(&items), 7);
        assert_eq!(knapsack.total_weight(&items), 5);
    }
}
