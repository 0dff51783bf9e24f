//! Gate definitions.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// Built-in gates with bound angles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    H,
    X,
    Y,
    Z,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    CX,
    CZ,
    /// Multi-controlled Z over the given number of qubits.
    ///
    /// Negates the amplitude of the state where every operand is `|1⟩`.
    Mcz(u32),
}

impl StandardGate {
    /// OpenQASM-style name.
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Mcz(_) => "mcz",
        }
    }

    /// Number of qubit operands.
    pub fn num_qubits(&self) -> usize {
        match self {
            StandardGate::CX | StandardGate::CZ => 2,
            StandardGate::Mcz(n) => *n as usize,
            _ => 1,
        }
    }

    /// Rotation angle, if the gate has one.
    pub fn angle(&self) -> Option<f64> {
        match self {
            StandardGate::Rx(theta) | StandardGate::Ry(theta) | StandardGate::Rz(theta) => {
                Some(*theta)
            }
            _ => None,
        }
    }
}

/// A diagonal oracle that flips the phase of marked basis states.
///
/// `marked[i]` refers to the basis state whose bit `k` is the value of the
/// oracle's `k`-th qubit operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseOracle {
    num_qubits: usize,
    marked: Vec<bool>,
}

impl PhaseOracle {
    /// Create an oracle from a full truth table over `num_qubits` qubits.
    pub fn new(num_qubits: usize, marked: Vec<bool>) -> IrResult<Self> {
        let expected = 1usize << num_qubits;
        if marked.len() != expected {
            return Err(IrError::OracleSizeMismatch {
                num_qubits,
                expected,
                got: marked.len(),
            });
        }
        Ok(Self { num_qubits, marked })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Whether the local basis state `index` is marked.
    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.get(index).copied().unwrap_or(false)
    }

    /// Number of marked basis states.
    pub fn num_marked(&self) -> usize {
        self.marked.iter().filter(|m| **m).count()
    }
}

/// Kind of gate carried by an instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    Standard(StandardGate),
    PhaseOracle(PhaseOracle),
}

/// A gate application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub kind: GateKind,
}

impl Gate {
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
        }
    }

    pub fn oracle(oracle: PhaseOracle) -> Self {
        Self {
            kind: GateKind::PhaseOracle(oracle),
        }
    }

    pub fn name(&self) -> &'static str {
        match &self.kind {
            GateKind::Standard(gate) => gate.name(),
            GateKind::PhaseOracle(_) => "oracle",
        }
    }

    pub fn num_qubits(&self) -> usize {
        match &self.kind {
            GateKind::Standard(gate) => gate.num_qubits(),
            GateKind::PhaseOracle(oracle) => oracle.num_qubits(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_arity() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::Mcz(4).num_qubits(), 4);
        assert_eq!(StandardGate::Rz(0.5).angle(), Some(0.5));
        assert_eq!(StandardGate::CZ.angle(), None);
    }

    #[test]
    fn test_oracle_size_checked() {
        assert!(PhaseOracle::new(2, vec![false; 4]).is_ok());
        let err = PhaseOracle::new(2, vec![false; 3]).unwrap_err();
        assert_eq!(
            err,
            IrError::OracleSizeMismatch {
                num_qubits: 2,
                expected: 4,
                got: 3
            }
        );
    }

    #[test]
    fn test_oracle_marking() {
        let oracle = PhaseOracle::new(2, vec![false, true, false, true]).unwrap();
        assert!(oracle.is_marked(1));
        assert!(!oracle.is_marked(2));
        assert!(!oracle.is_marked(17));
        assert_eq!(oracle.num_marked(), 2);
        assert_eq!(Gate::oracle(oracle).name(), "oracle");
    }
}
