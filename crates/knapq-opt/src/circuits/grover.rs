//! Grover search circuits over a phase oracle.

use knapq_ir::{Circuit, PhaseOracle, QubitId};

use crate::error::{OptError, OptResult};

/// Append the inversion-about-the-mean operator on `qubits`.
pub fn diffuser(circuit: &mut Circuit, qubits: &[QubitId]) -> OptResult<()> {
    for &q in qubits {
        circuit.h(q)?.x(q)?;
    }
    circuit.mcz(qubits)?;
    for &q in qubits {
        circuit.x(q)?.h(q)?;
    }
    Ok(())
}

/// Uniform superposition followed by `iterations` rounds of oracle and
/// diffuser. Measurements are left to the caller.
pub fn grover_circuit(
    num_qubits: usize,
    oracle: &PhaseOracle,
    iterations: usize,
) -> OptResult<Circuit> {
    if oracle.num_qubits() != num_qubits {
        return Err(OptError::InvalidProblem(format!(
            "oracle acts on {} qubits but the search register has {}",
            oracle.num_qubits(),
            num_qubits
        )));
    }
    let qubits: Vec<QubitId> = (0..num_qubits).map(QubitId::from).collect();
    let mut circuit = Circuit::with_size("grover", num_qubits as u32, 0);
    for &q in &qubits {
        circuit.h(q)?;
    }
    for _ in 0..iterations {
        circuit.phase_oracle(oracle.clone(), &qubits)?;
        diffuser(&mut circuit, &qubits)?;
    }
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use knapq_adapter_sim::SimBackend;
    use knapq_hal::Backend;

    fn marked(n: usize, target: usize) -> PhaseOracle {
        let table = (0..1usize << n).map(|i| i == target).collect();
        PhaseOracle::new(n, table).unwrap()
    }

    #[test]
    fn test_operation_counts() {
        let circuit = grover_circuit(3, &marked(3, 5), 2).unwrap();
        let ops = circuit.count_ops();
        assert_eq!(ops["oracle"], 2);
        assert_eq!(ops["mcz"], 2);
        assert_eq!(ops["h"], 3 + 2 * 6);
        assert_eq!(ops["x"], 2 * 6);
    }

    #[test]
    fn test_amplifies_marked_state() {
        let mut circuit = grover_circuit(3, &marked(3, 5), 2).unwrap();
        circuit.measure_all().unwrap();
        let dist = SimBackend::new().probabilities(&circuit).unwrap();
        let (best, p) = dist.most_likely().unwrap();
        assert_eq!(best, 5);
        assert!(p > 0.9);
    }

    #[test]
    fn test_zero_iterations_is_uniform() {
        let mut circuit = grover_circuit(2, &marked(2, 1), 0).unwrap();
        circuit.measure_all().unwrap();
        let dist = SimBackend::new().probabilities(&circuit).unwrap();
        for outcome in 0..4 {
            assert!((dist.probability(outcome) - 0.25).abs() < 1e-9);
        }
    }

    #[test]
    fn test_oracle_width_checked() {
        assert!(grover_circuit(2, &marked(3, 0), 1).is_err());
    }
}
