//! Simulator backend.

use knapq_hal::{
    Backend, Capabilities, Counts, Distribution, ExecutionResult, HalError, HalResult, RunConfig,
};
use knapq_ir::{Circuit, InstructionKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::statevector::Statevector;

/// Largest register the simulator accepts by default.
pub const DEFAULT_MAX_QUBITS: usize = 24;

/// Statevector simulator backend.
#[derive(Debug, Clone)]
pub struct SimBackend {
    caps: Capabilities,
}

impl Default for SimBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBackend {
    pub fn new() -> Self {
        Self {
            caps: Capabilities {
                name: "statevector_simulator".to_string(),
                max_qubits: DEFAULT_MAX_QUBITS,
                exact: true,
            },
        }
    }

    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.caps.max_qubits = max_qubits;
        self
    }

    /// Evolve the circuit and return the final state together with the
    /// `(qubit, clbit)` measurement map and classical register width.
    fn simulate(&self, circuit: &Circuit) -> HalResult<(Statevector, Vec<(usize, usize)>, usize)> {
        let n = circuit.num_qubits();
        if n > self.caps.max_qubits {
            return Err(HalError::TooManyQubits {
                requested: n,
                max: self.caps.max_qubits,
            });
        }

        let mut state = Statevector::new(n);
        let mut measured = vec![false; n];
        let mut measurements = Vec::new();
        let mut operands = Vec::with_capacity(4);

        for instr in circuit.instructions() {
            match &instr.kind {
                InstructionKind::Gate(gate) => {
                    operands.clear();
                    for q in &instr.qubits {
                        let q = q.0 as usize;
                        if measured[q] {
                            return Err(HalError::Execution(format!(
                                "gate '{}' acts on qubit {} after it was measured",
                                gate.name(),
                                q
                            )));
                        }
                        operands.push(q);
                    }
                    state.apply(gate, &operands);
                }
                InstructionKind::Measure => {
                    let q = instr.qubits[0].0 as usize;
                    let c = instr.clbits[0].0 as usize;
                    measured[q] = true;
                    measurements.push((q, c));
                }
                InstructionKind::Barrier => {}
            }
        }

        if measurements.is_empty() {
            measurements = (0..n).map(|q| (q, q)).collect();
            Ok((state, measurements, n.max(circuit.num_clbits())))
        } else {
            Ok((state, measurements, circuit.num_clbits()))
        }
    }
}

/// Map a basis state onto the classical register.
fn outcome(basis: usize, measurements: &[(usize, usize)]) -> u64 {
    measurements.iter().fold(0u64, |acc, (q, c)| {
        acc | ((((basis >> q) & 1) as u64) << c)
    })
}

impl Backend for SimBackend {
    fn name(&self) -> &str {
        &self.caps.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    fn run(&self, circuit: &Circuit, config: &RunConfig) -> HalResult<ExecutionResult> {
        if config.shots == 0 {
            return Err(HalError::InvalidShots);
        }
        let (state, measurements, num_clbits) = self.simulate(circuit)?;

        let mut cumulative = Vec::with_capacity(1 << state.num_qubits());
        let mut acc = 0.0;
        for p in state.probabilities() {
            acc += p;
            cumulative.push(acc);
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut counts = Counts::new(num_clbits);
        let last = cumulative.len() - 1;
        for _ in 0..config.shots {
            let r = rng.gen_range(0.0..acc);
            let basis = cumulative.partition_point(|c| *c <= r).min(last);
            counts.insert(outcome(basis, &measurements), 1);
        }

        debug!(
            circuit = circuit.name(),
            qubits = circuit.num_qubits(),
            shots = config.shots,
            "simulated circuit"
        );

        Ok(ExecutionResult {
            backend: self.caps.name.clone(),
            shots: config.shots,
            counts,
        })
    }

    fn probabilities(&self, circuit: &Circuit) -> HalResult<Distribution> {
        let (state, measurements, num_clbits) = self.simulate(circuit)?;
        let probs = state.probabilities();
        Ok(Distribution::from_probabilities(
            num_clbits,
            probs
                .into_iter()
                .enumerate()
                .map(|(basis, p)| (outcome(basis, &measurements), p)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knapq_ir::{ClbitId, QubitId};

    fn bell() -> Circuit {
        let mut circuit = Circuit::with_size("bell", 2, 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.measure_all().unwrap();
        circuit
    }

    #[test]
    fn test_bell_probabilities() {
        let dist = SimBackend::new().probabilities(&bell()).unwrap();
        assert_eq!(dist.len(), 2);
        assert!((dist.probability(0b00) - 0.5).abs() < 1e-10);
        assert!((dist.probability(0b11) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_bell_sampling() {
        let backend = SimBackend::new();
        let result = backend
            .run(&bell(), &RunConfig::new(200).with_seed(10))
            .unwrap();

        assert_eq!(result.shots, 200);
        assert_eq!(result.counts.total(), 200);
        assert_eq!(result.counts.get(0b01) + result.counts.get(0b10), 0);
    }

    #[test]
    fn test_seeded_sampling_reproducible() {
        let backend = SimBackend::new();
        let config = RunConfig::new(1).with_seed(10);
        let a = backend.run(&bell(), &config).unwrap();
        let b = backend.run(&bell(), &config).unwrap();
        assert_eq!(a.counts, b.counts);
    }

    #[test]
    fn test_measurement_remapping() {
        let mut circuit = Circuit::with_size("swap", 2, 2);
        circuit.x(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(1)).unwrap();
        circuit.measure(QubitId(1), ClbitId(0)).unwrap();

        let dist = SimBackend::new().probabilities(&circuit).unwrap();
        assert_eq!(dist.most_likely(), Some((0b10, 1.0)));
    }

    #[test]
    fn test_implicit_measure_all() {
        let mut circuit = Circuit::with_size("x", 2, 0);
        circuit.x(QubitId(1)).unwrap();

        let dist = SimBackend::new().probabilities(&circuit).unwrap();
        assert_eq!(dist.num_bits(), 2);
        assert_eq!(dist.most_likely(), Some((0b10, 1.0)));
    }

    #[test]
    fn test_mid_circuit_measurement_rejected() {
        let mut circuit = Circuit::with_size("mid", 1, 1);
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();

        let err = SimBackend::new().probabilities(&circuit).unwrap_err();
        assert!(matches!(err, HalError::Execution(_)));
    }

    #[test]
    fn test_qubit_limit() {
        let backend = SimBackend::new().with_max_qubits(2);
        let err = backend
            .probabilities(&Circuit::with_size("big", 3, 0))
            .unwrap_err();
        assert!(matches!(err, HalError::TooManyQubits { requested: 3, max: 2 }));
    }
}
