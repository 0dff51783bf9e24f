//! The backend trait.

use knapq_ir::Circuit;
use serde::{Deserialize, Serialize};

use crate::error::HalResult;
use crate::result::{Counts, Distribution};

/// Static description of what a backend can do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub name: String,
    pub max_qubits: usize,
    /// Whether [`Backend::probabilities`] is supported.
    pub exact: bool,
}

/// Per-run options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub shots: u32,
    /// Seed for shot sampling. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl RunConfig {
    pub fn new(shots: u32) -> Self {
        Self { shots, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Sampled result of one circuit execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub backend: String,
    pub shots: u32,
    pub counts: Counts,
}

/// A device or simulator that executes circuits synchronously.
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> &Capabilities;

    /// Whether the backend can accept work right now.
    fn is_available(&self) -> bool {
        true
    }

    /// Execute `circuit` and sample `config.shots` outcomes.
    fn run(&self, circuit: &Circuit, config: &RunConfig) -> HalResult<ExecutionResult>;

    /// Exact outcome probabilities of the measured register.
    fn probabilities(&self, circuit: &Circuit) -> HalResult<Distribution>;
}
