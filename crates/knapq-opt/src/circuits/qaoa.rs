//! QAOA ansatz for diagonal cost Hamiltonians.
//!
//! The circuit prepares `|+⟩^n` and then applies `p` layers of
//! `exp(-i γ_k H_C)` followed by `exp(-i β_k Σ X_j)`.

use knapq_ir::{Circuit, QubitId};
use std::f64::consts::PI;

use crate::error::{OptError, OptResult};
use crate::problems::PauliHamiltonian;

/// Build the QAOA circuit for `cost` with one `(gamma, beta)` pair per layer.
///
/// Single-`Z` terms become `RZ(2γc)` and `ZZ` terms the usual
/// `CX · RZ(2γc) · CX` ladder. Identity terms only add a global phase and are
/// skipped. The circuit carries no measurements.
pub fn qaoa_ansatz(cost: &PauliHamiltonian, gamma: &[f64], beta: &[f64]) -> OptResult<Circuit> {
    if gamma.len() != beta.len() {
        return Err(OptError::ParameterCountMismatch {
            expected: 2 * gamma.len(),
            got: gamma.len() + beta.len(),
        });
    }
    if let Some(term) = cost.first_non_diagonal() {
        return Err(OptError::NonDiagonalOperator(term.label(cost.num_qubits())));
    }

    let n = cost.num_qubits();
    let mut circuit = Circuit::with_size("qaoa", n as u32, 0);
    for q in 0..n {
        circuit.h(QubitId::from(q))?;
    }

    for (&g, &b) in gamma.iter().zip(beta) {
        apply_cost_layer(&mut circuit, cost, g)?;
        for q in 0..n {
            circuit.rx(2.0 * b, QubitId::from(q))?;
        }
    }
    Ok(circuit)
}

fn apply_cost_layer(circuit: &mut Circuit, cost: &PauliHamiltonian, gamma: f64) -> OptResult<()> {
    for term in &cost.terms {
        let angle = 2.0 * gamma * term.coefficient;
        match term.support().as_slice() {
            [] => {}
            [q] => {
                circuit.rz(angle, QubitId::from(*q))?;
            }
            [q0, q1] => {
                let (a, b) = (QubitId::from(*q0), QubitId::from(*q1));
                circuit.cx(a, b)?.rz(angle, b)?.cx(a, b)?;
            }
            support => {
                // Parity ladder onto the last qubit of the support.
                let target = QubitId::from(support[support.len() - 1]);
                for q in &support[..support.len() - 1] {
                    circuit.cx(QubitId::from(*q), target)?;
                }
                circuit.rz(angle, target)?;
                for q in support[..support.len() - 1].iter().rev() {
                    circuit.cx(QubitId::from(*q), target)?;
                }
            }
        }
    }
    Ok(())
}

/// Linear-ramp starting point `[γ_0..γ_p, β_0..β_p]`.
///
/// γ ramps up and β ramps down over the layers, an annealing-like schedule
/// that is a reasonable default for shallow circuits.
pub fn initial_parameters(p: usize) -> Vec<f64> {
    let p_f = p as f64;
    let gammas = (0..p).map(|i| PI / 4.0 * (i as f64 + 1.0) / p_f);
    let betas = (0..p).map(|i| PI / 4.0 * (p_f - i as f64) / p_f);
    gammas.chain(betas).collect()
}

/// Number of parameters for `p` layers.
pub fn num_parameters(p: usize) -> usize {
    2 * p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::PauliTerm;

    fn cost() -> PauliHamiltonian {
        PauliHamiltonian::new(vec![
            PauliTerm::identity(3.0),
            PauliTerm::z(0.5, 0),
            PauliTerm::zz(-1.0, 0, 2),
        ])
    }

    #[test]
    fn test_gate_counts() {
        let circuit = qaoa_ansatz(&cost(), &[0.1, 0.2], &[0.3, 0.4]).unwrap();
        let ops = circuit.count_ops();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(ops["h"], 3);
        assert_eq!(ops["rz"], 4);
        assert_eq!(ops["cx"], 4);
        assert_eq!(ops["rx"], 6);
        assert!(!circuit.has_measurements());
    }

    #[test]
    fn test_idle_qubits_get_mixer() {
        let h = PauliHamiltonian::new(vec![PauliTerm::z(1.0, 0)]).with_num_qubits(2);
        let circuit = qaoa_ansatz(&h, &[0.1], &[0.2]).unwrap();
        assert_eq!(circuit.count_ops()["rx"], 2);
    }

    #[test]
    fn test_mismatched_parameters() {
        let err = qaoa_ansatz(&cost(), &[0.1, 0.2], &[0.3]).unwrap_err();
        assert!(matches!(
            err,
            OptError::ParameterCountMismatch { expected: 4, got: 3 }
        ));
    }

    #[test]
    fn test_non_diagonal_rejected() {
        let h = PauliHamiltonian::new(vec![PauliTerm::xx(1.0, 0, 1)]);
        assert!(matches!(
            qaoa_ansatz(&h, &[0.1], &[0.2]),
            Err(OptError::NonDiagonalOperator(label)) if label == "XX"
        ));
    }

    #[test]
    fn test_initial_parameters() {
        assert_eq!(num_parameters(3), 6);
        let params = initial_parameters(2);
        assert_eq!(params.len(), 4);
        assert!((params[0] - PI / 8.0).abs() < 1e-12);
        assert!((params[1] - PI / 4.0).abs() < 1e-12);
        assert!((params[2] - PI / 4.0).abs() < 1e-12);
        assert!((params[3] - PI / 8.0).abs() < 1e-12);
    }
}
