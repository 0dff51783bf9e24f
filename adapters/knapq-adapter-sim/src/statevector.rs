//! Dense statevector and gate kernels.

use knapq_ir::{Gate, GateKind, PhaseOracle, StandardGate};
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

/// Amplitudes of an `n`-qubit register, qubit `q` at bit `q` of the index.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// The all-zero state `|0...0⟩`.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Apply `gate` to the given qubit indices.
    ///
    /// Operands must already be validated against the register size.
    pub fn apply(&mut self, gate: &Gate, qubits: &[usize]) {
        match &gate.kind {
            GateKind::Standard(std_gate) => self.apply_standard(std_gate, qubits),
            GateKind::PhaseOracle(oracle) => self.apply_oracle(oracle, qubits),
        }
    }

    fn apply_standard(&mut self, gate: &StandardGate, qubits: &[usize]) {
        let state = &mut self.amplitudes;
        match gate {
            StandardGate::H => {
                let q = qubits[0];
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                for i in 0..state.len() {
                    if (i >> q) & 1 == 0 {
                        let j = i | (1 << q);
                        let a = state[i];
                        let b = state[j];
                        state[i] = h * (a + b);
                        state[j] = h * (a - b);
                    }
                }
            }
            StandardGate::X => {
                let q = qubits[0];
                for i in 0..state.len() {
                    if (i >> q) & 1 == 0 {
                        state.swap(i, i | (1 << q));
                    }
                }
            }
            StandardGate::Y => {
                let q = qubits[0];
                for i in 0..state.len() {
                    if (i >> q) & 1 == 0 {
                        let j = i | (1 << q);
                        let a = state[i];
                        let b = state[j];
                        state[i] = Complex64::new(0.0, -1.0) * b;
                        state[j] = Complex64::new(0.0, 1.0) * a;
                    }
                }
            }
            StandardGate::Z => {
                let q = qubits[0];
                for (i, amp) in state.iter_mut().enumerate() {
                    if (i >> q) & 1 == 1 {
                        *amp = -*amp;
                    }
                }
            }
            StandardGate::Rx(theta) => {
                let q = qubits[0];
                let c = (theta / 2.0).cos();
                let s = (theta / 2.0).sin();
                for i in 0..state.len() {
                    if (i >> q) & 1 == 0 {
                        let j = i | (1 << q);
                        let a = state[i];
                        let b = state[j];
                        state[i] = Complex64::new(c, 0.0) * a - Complex64::new(0.0, s) * b;
                        state[j] = Complex64::new(0.0, -s) * a + Complex64::new(c, 0.0) * b;
                    }
                }
            }
            StandardGate::Ry(theta) => {
                let q = qubits[0];
                let c = (theta / 2.0).cos();
                let s = (theta / 2.0).sin();
                for i in 0..state.len() {
                    if (i >> q) & 1 == 0 {
                        let j = i | (1 << q);
                        let a = state[i];
                        let b = state[j];
                        state[i] = a * c - b * s;
                        state[j] = a * s + b * c;
                    }
                }
            }
            StandardGate::Rz(theta) => {
                let q = qubits[0];
                let phase0 = Complex64::from_polar(1.0, -theta / 2.0);
                let phase1 = Complex64::from_polar(1.0, theta / 2.0);
                for (i, amp) in state.iter_mut().enumerate() {
                    if (i >> q) & 1 == 0 {
                        *amp *= phase0;
                    } else {
                        *amp *= phase1;
                    }
                }
            }
            StandardGate::CX => {
                let control = qubits[0];
                let target = qubits[1];
                for i in 0..state.len() {
                    if (i >> control) & 1 == 1 && (i >> target) & 1 == 0 {
                        state.swap(i, i | (1 << target));
                    }
                }
            }
            StandardGate::CZ | StandardGate::Mcz(_) => {
                let mask = qubits.iter().fold(0usize, |m, q| m | (1 << q));
                for (i, amp) in state.iter_mut().enumerate() {
                    if i & mask == mask {
                        *amp = -*amp;
                    }
                }
            }
        }
    }

    fn apply_oracle(&mut self, oracle: &PhaseOracle, qubits: &[usize]) {
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            let local = qubits
                .iter()
                .enumerate()
                .fold(0usize, |acc, (k, q)| acc | (((i >> q) & 1) << k));
            if oracle.is_marked(local) {
                *amp = -*amp;
            }
        }
    }
}
