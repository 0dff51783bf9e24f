//! Execution context shared by the algorithms of one benchmark run.

use std::fmt;
use std::sync::Arc;

use knapq_ir::Circuit;
use tracing::trace;

use crate::backend::{Backend, RunConfig};
use crate::error::{HalError, HalResult};
use crate::result::Distribution;

/// Default number of shots for a sampling instance.
pub const DEFAULT_SHOTS: u32 = 1024;

/// A backend bound to fixed execution options.
///
/// Executing through a `QuantumInstance` never mutates it: with a fixed
/// `seed_simulator`, the same circuit yields the same outcomes every time.
#[derive(Clone)]
pub struct QuantumInstance {
    backend: Arc<dyn Backend>,
    shots: Option<u32>,
    seed_simulator: Option<u64>,
}

impl QuantumInstance {
    /// Sampling instance with [`DEFAULT_SHOTS`] shots and no seed.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            shots: Some(DEFAULT_SHOTS),
            seed_simulator: None,
        }
    }

    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Use exact probabilities instead of sampling.
    pub fn with_exact_probabilities(mut self) -> Self {
        self.shots = None;
        self
    }

    pub fn with_seed_simulator(mut self, seed: u64) -> Self {
        self.seed_simulator = Some(seed);
        self
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn shots(&self) -> Option<u32> {
        self.shots
    }

    pub fn seed_simulator(&self) -> Option<u64> {
        self.seed_simulator
    }

    pub fn is_exact(&self) -> bool {
        self.shots.is_none()
    }

    /// Fail unless the backend can take work and `num_qubits` fits on it.
    pub fn check(&self, num_qubits: usize) -> HalResult<()> {
        if !self.backend.is_available() {
            return Err(HalError::Unavailable(self.backend.name().to_string()));
        }
        let max = self.backend.capabilities().max_qubits;
        if num_qubits > max {
            return Err(HalError::TooManyQubits {
                requested: num_qubits,
                max,
            });
        }
        Ok(())
    }

    /// Execute `circuit` and return the distribution of its measured register.
    pub fn execute(&self, circuit: &Circuit) -> HalResult<Distribution> {
        self.check(circuit.num_qubits())?;

        match self.shots {
            Some(0) => Err(HalError::InvalidShots),
            Some(shots) => {
                let mut config = RunConfig::new(shots);
                if let Some(seed) = self.seed_simulator {
                    config = config.with_seed(seed);
                }
                let result = self.backend.run(circuit, &config)?;
                trace!(
                    circuit = circuit.name(),
                    shots,
                    outcomes = result.counts.len(),
                    "sampled circuit"
                );
                Ok(Distribution::from_counts(&result.counts))
            }
            None => {
                if !self.backend.capabilities().exact {
                    return Err(HalError::Unsupported {
                        backend: self.backend.name().to_string(),
                        feature: "exact probabilities",
                    });
                }
                self.backend.probabilities(circuit)
            }
        }
    }
}

impl fmt::Debug for QuantumInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantumInstance")
            .field("backend", &self.backend.name())
            .field("shots", &self.shots)
            .field("seed_simulator", &self.seed_simulator)
            .finish()
    }
}
