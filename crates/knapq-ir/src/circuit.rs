//! Quantum circuit container and builder.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, PhaseOracle, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// An ordered list of instructions over fixed quantum and classical registers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create an empty circuit with the given register sizes.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions, barriers included.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Whether any qubit is measured.
    pub fn has_measurements(&self) -> bool {
        self.instructions
            .iter()
            .any(|instr| matches!(instr.kind, InstructionKind::Measure))
    }

    /// Append a gate after validating its operands.
    pub fn apply(&mut self, gate: Gate, qubits: &[QubitId]) -> IrResult<&mut Self> {
        if qubits.len() != gate.num_qubits() {
            return Err(IrError::ArityMismatch {
                gate: gate.name(),
                expected: gate.num_qubits(),
                got: qubits.len(),
            });
        }
        self.check_qubits(qubits)?;
        self.instructions
            .push(Instruction::gate(gate, qubits.to_vec()));
        Ok(self)
    }

    fn apply_standard(&mut self, gate: StandardGate, qubits: &[QubitId]) -> IrResult<&mut Self> {
        self.apply(Gate::standard(gate), qubits)
    }

    pub fn h(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::H, &[q])
    }

    pub fn x(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::X, &[q])
    }

    pub fn y(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::Y, &[q])
    }

    pub fn z(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::Z, &[q])
    }

    pub fn rx(&mut self, theta: f64, q: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::Rx(theta), &[q])
    }

    pub fn ry(&mut self, theta: f64, q: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::Ry(theta), &[q])
    }

    pub fn rz(&mut self, theta: f64, q: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::Rz(theta), &[q])
    }

    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::CX, &[control, target])
    }

    pub fn cz(&mut self, q0: QubitId, q1: QubitId) -> IrResult<&mut Self> {
        self.apply_standard(StandardGate::CZ, &[q0, q1])
    }

    /// Multi-controlled Z. A single operand degrades to `Z`.
    pub fn mcz(&mut self, qubits: &[QubitId]) -> IrResult<&mut Self> {
        match qubits {
            [q] => self.z(*q),
            [q0, q1] => self.cz(*q0, *q1),
            _ => self.apply_standard(StandardGate::Mcz(qubits.len() as u32), qubits),
        }
    }

    /// Append a diagonal phase oracle acting on `qubits`.
    pub fn phase_oracle(&mut self, oracle: PhaseOracle, qubits: &[QubitId]) -> IrResult<&mut Self> {
        self.apply(Gate::oracle(oracle), qubits)
    }

    pub fn measure(&mut self, q: QubitId, c: ClbitId) -> IrResult<&mut Self> {
        self.check_qubits(&[q])?;
        if c.0 >= self.num_clbits {
            return Err(IrError::ClbitOutOfRange {
                clbit: c.0,
                num_clbits: self.num_clbits,
            });
        }
        self.instructions.push(Instruction::measure(q, c));
        Ok(self)
    }

    /// Measure qubit `i` into clbit `i` for every qubit, growing the
    /// classical register if it is too small.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        if self.num_clbits < self.num_qubits {
            self.num_clbits = self.num_qubits;
        }
        for q in 0..self.num_qubits {
            self.measure(QubitId(q), ClbitId(q))?;
        }
        Ok(self)
    }

    pub fn barrier(&mut self, qubits: &[QubitId]) -> IrResult<&mut Self> {
        self.check_qubits(qubits)?;
        self.instructions.push(Instruction::barrier(qubits.to_vec()));
        Ok(self)
    }

    /// Circuit depth: the longest chain of non-barrier instructions sharing a
    /// qubit or clbit.
    pub fn depth(&self) -> usize {
        let mut qubit_level = vec![0usize; self.num_qubits as usize];
        let mut clbit_level = vec![0usize; self.num_clbits as usize];

        for instr in &self.instructions {
            if matches!(instr.kind, InstructionKind::Barrier) {
                continue;
            }
            let start = instr
                .qubits
                .iter()
                .map(|q| qubit_level[q.0 as usize])
                .chain(instr.clbits.iter().map(|c| clbit_level[c.0 as usize]))
                .max()
                .unwrap_or(0);
            let level = start + 1;
            for q in &instr.qubits {
                qubit_level[q.0 as usize] = level;
            }
            for c in &instr.clbits {
                clbit_level[c.0 as usize] = level;
            }
        }

        qubit_level
            .into_iter()
            .chain(clbit_level)
            .max()
            .unwrap_or(0)
    }

    /// Number of instructions per operation name.
    pub fn count_ops(&self) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for instr in &self.instructions {
            *counts.entry(instr.name()).or_insert(0) += 1;
        }
        counts
    }

    fn check_qubits(&self, qubits: &[QubitId]) -> IrResult<()> {
        for (i, q) in qubits.iter().enumerate() {
            if q.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit: q.0,
                    num_qubits: self.num_qubits,
                });
            }
            if qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit(q.0));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bell_circuit() {
        let mut circuit = Circuit::with_size("bell", 2, 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.measure_all().unwrap();

        assert_eq!(circuit.len(), 4);
        assert_eq!(circuit.depth(), 3);
        assert!(circuit.has_measurements());

        let ops = circuit.count_ops();
        assert_eq!(ops["h"], 1);
        assert_eq!(ops["cx"], 1);
        assert_eq!(ops["measure"], 2);
    }

    #[test]
    fn test_measure_all_grows_clbits() {
        let mut circuit = Circuit::with_size("grow", 3, 0);
        circuit.measure_all().unwrap();
        assert_eq!(circuit.num_clbits(), 3);
    }

    #[test]
    fn test_out_of_range_qubit() {
        let mut circuit = Circuit::with_size("bad", 2, 0);
        let err = circuit.h(QubitId(2)).unwrap_err();
        assert_eq!(
            err,
            IrError::QubitOutOfRange {
                qubit: 2,
                num_qubits: 2
            }
        );
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut circuit = Circuit::with_size("bad", 2, 0);
        assert_eq!(
            circuit.cx(QubitId(1), QubitId(1)).unwrap_err(),
            IrError::DuplicateQubit(1)
        );
    }

    #[test]
    fn test_mcz_degrades() {
        let mut circuit = Circuit::with_size("mcz", 3, 0);
        circuit.mcz(&[QubitId(0)]).unwrap();
        circuit.mcz(&[QubitId(0), QubitId(1)]).unwrap();
        circuit.mcz(&[QubitId(0), QubitId(1), QubitId(2)]).unwrap();

        let names: Vec<_> = circuit.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["z", "cz", "mcz"]);
    }

    #[test]
    fn test_barrier_not_counted_in_depth() {
        let mut circuit = Circuit::with_size("b", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.barrier(&[QubitId(0), QubitId(1)]).unwrap();
        circuit.h(QubitId(1)).unwrap();
        assert_eq!(circuit.depth(), 1);
    }

    proptest! {
        #[test]
        fn depth_bounded_by_gate_count(ops in prop::collection::vec((0u32..4, 0u32..4), 0..64)) {
            let mut circuit = Circuit::with_size("random", 4, 0);
            for (a, b) in &ops {
                if a == b {
                    circuit.h(QubitId(*a)).unwrap();
                } else {
                    circuit.cx(QubitId(*a), QubitId(*b)).unwrap();
                }
            }
            prop_assert!(circuit.depth() <= ops.len());
            prop_assert_eq!(circuit.len(), ops.len());
        }
    }
}
