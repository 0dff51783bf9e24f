//! Harness configuration and the benchmark parameter grid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{BenchError, BenchResult};

/// Item counts swept by the suite.
pub const ITEM_COUNTS: [usize; 4] = [2, 3, 4, 5];

/// Upper bounds for generated values and weights, also used as capacity.
pub const MAX_WEIGHTS: [u64; 4] = [2, 4, 8, 16];

/// Seed used for every random source unless configured otherwise.
pub const DEFAULT_SEED: u64 = 10;

/// One point of the parameter grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BenchParams {
    pub num_items: usize,
    pub max_weight: u64,
}

impl BenchParams {
    pub fn new(num_items: usize, max_weight: u64) -> Self {
        Self {
            num_items,
            max_weight,
        }
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.num_items == 0 {
            return Err(BenchError::InvalidParams(
                "number of items must be positive".to_string(),
            ));
        }
        if self.max_weight == 0 {
            return Err(BenchError::InvalidParams(
                "max weight must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for BenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.num_items, self.max_weight)
    }
}

/// Cartesian product of [`ITEM_COUNTS`] and [`MAX_WEIGHTS`], item-major.
pub fn parameter_grid() -> Vec<BenchParams> {
    ITEM_COUNTS
        .iter()
        .flat_map(|&n| MAX_WEIGHTS.iter().map(move |&w| BenchParams::new(n, w)))
        .collect()
}

/// Seeds and budgets shared by every operation of a run.
///
/// ```yaml
/// problem_seed: 10
/// simulator_seed: 10
/// algorithm_seed: 10
/// shots: 1
/// optimizer_maxiter: 1
/// grover_iterations: 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Seeds value/weight generation.
    pub problem_seed: u64,
    /// Seeds shot sampling in the simulator.
    pub simulator_seed: u64,
    /// Seeds VQE initial points and Grover rotation counts.
    pub algorithm_seed: u64,
    pub shots: u32,
    /// COBYLA objective-evaluation cap for QAOA and VQE.
    pub optimizer_maxiter: usize,
    /// Non-improving Grover measurements before the search stops.
    pub grover_iterations: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            problem_seed: DEFAULT_SEED,
            simulator_seed: DEFAULT_SEED,
            algorithm_seed: DEFAULT_SEED,
            shots: 1,
            optimizer_maxiter: 1,
            grover_iterations: 1,
        }
    }
}

impl HarnessConfig {
    /// Parse and validate a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> BenchResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> BenchResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.shots == 0 {
            return Err(BenchError::Config("shots must be positive".to_string()));
        }
        if self.optimizer_maxiter == 0 {
            return Err(BenchError::Config(
                "optimizer_maxiter must be positive".to_string(),
            ));
        }
        if self.grover_iterations == 0 {
            return Err(BenchError::Config(
                "grover_iterations must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
