//! Random knapsack instances.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use knapq_opt::Knapsack;

use crate::config::BenchParams;
use crate::error::BenchResult;

/// Values, weights and capacity of one generated knapsack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemInstance {
    pub values: Vec<u64>,
    pub weights: Vec<u64>,
    pub max_weight: u64,
}

impl ProblemInstance {
    /// Draw all values, then all weights, uniformly from `[1, max_weight]`.
    /// The capacity is `max_weight` itself.
    pub fn generate<R: Rng + ?Sized>(params: BenchParams, rng: &mut R) -> BenchResult<Self> {
        params.validate()?;
        let max = params.max_weight;
        let values = (0..params.num_items).map(|_| rng.gen_range(1..=max)).collect();
        let weights = (0..params.num_items).map(|_| rng.gen_range(1..=max)).collect();
        Ok(Self {
            values,
            weights,
            max_weight: max,
        })
    }

    pub fn from_seed(params: BenchParams, seed: u64) -> BenchResult<Self> {
        Self::generate(params, &mut StdRng::seed_from_u64(seed))
    }

    pub fn num_items(&self) -> usize {
        self.values.len()
    }

    pub fn to_knapsack(&self) -> BenchResult<Knapsack> {
        Ok(Knapsack::new(
            self.values.clone(),
            self.weights.clone(),
            self.max_weight,
        )?)
    }
}
