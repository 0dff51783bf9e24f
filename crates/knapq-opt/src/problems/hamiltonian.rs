//! Pauli-sum Hamiltonians.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

/// `coefficient · P_{q0} ⊗ P_{q1} ⊗ ...`; qubits not listed carry identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    pub coefficient: f64,
    pub operators: Vec<(usize, Pauli)>,
}

impl PauliTerm {
    pub fn new(coefficient: f64, operators: Vec<(usize, Pauli)>) -> Self {
        Self {
            coefficient,
            operators,
        }
    }

    pub fn identity(coefficient: f64) -> Self {
        Self::new(coefficient, Vec::new())
    }

    pub fn z(coefficient: f64, qubit: usize) -> Self {
        Self::new(coefficient, vec![(qubit, Pauli::Z)])
    }

    pub fn zz(coefficient: f64, q0: usize, q1: usize) -> Self {
        Self::new(coefficient, vec![(q0, Pauli::Z), (q1, Pauli::Z)])
    }

    pub fn xx(coefficient: f64, q0: usize, q1: usize) -> Self {
        Self::new(coefficient, vec![(q0, Pauli::X), (q1, Pauli::X)])
    }

    /// Whether the term only has `I` and `Z` factors.
    pub fn is_diagonal(&self) -> bool {
        self.operators
            .iter()
            .all(|(_, p)| matches!(p, Pauli::I | Pauli::Z))
    }

    pub fn is_identity(&self) -> bool {
        self.operators.iter().all(|(_, p)| *p == Pauli::I)
    }

    /// Qubits carrying a non-identity factor, in operator order.
    pub fn support(&self) -> Vec<usize> {
        self.operators
            .iter()
            .filter(|(_, p)| *p != Pauli::I)
            .map(|(q, _)| *q)
            .collect()
    }

    /// Eigenvalue on computational basis state `basis`, for diagonal terms.
    fn diagonal_value(&self, basis: u64) -> f64 {
        let parity = self
            .operators
            .iter()
            .filter(|(_, p)| *p == Pauli::Z)
            .fold(0u64, |acc, (q, _)| acc ^ ((basis >> q) & 1));
        if parity == 1 {
            -self.coefficient
        } else {
            self.coefficient
        }
    }

    /// Pauli label, most significant qubit first, e.g. `"IZZ"`.
    pub fn label(&self, num_qubits: usize) -> String {
        let mut label = vec!['I'; num_qubits];
        for (q, p) in &self.operators {
            if *q < num_qubits {
                label[num_qubits - 1 - q] = match p {
                    Pauli::I => 'I',
                    Pauli::X => 'X',
                    Pauli::Y => 'Y',
                    Pauli::Z => 'Z',
                };
            }
        }
        label.into_iter().collect()
    }
}

/// A weighted sum of Pauli terms.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PauliHamiltonian {
    pub terms: Vec<PauliTerm>,
    min_qubits: usize,
}

impl PauliHamiltonian {
    pub fn new(terms: Vec<PauliTerm>) -> Self {
        Self {
            terms,
            min_qubits: 0,
        }
    }

    /// Declare the register width even if some qubits carry no term.
    pub fn with_num_qubits(mut self, num_qubits: usize) -> Self {
        self.min_qubits = num_qubits;
        self
    }

    pub fn num_qubits(&self) -> usize {
        let used = self
            .terms
            .iter()
            .flat_map(|t| t.operators.iter().map(|(q, _)| q + 1))
            .max()
            .unwrap_or(0);
        used.max(self.min_qubits)
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Sum of the coefficients of identity terms.
    pub fn identity_coefficient(&self) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.is_identity())
            .map(|t| t.coefficient)
            .sum()
    }

    pub fn is_diagonal(&self) -> bool {
        self.terms.iter().all(PauliTerm::is_diagonal)
    }

    /// First term that is not diagonal, if any.
    pub fn first_non_diagonal(&self) -> Option<&PauliTerm> {
        self.terms.iter().find(|t| !t.is_diagonal())
    }

    /// Energy of computational basis state `basis`.
    ///
    /// Only `I` and `Z` factors are evaluated, so the result is meaningful
    /// only when [`is_diagonal`](Self::is_diagonal) holds.
    pub fn diagonal_value(&self, basis: u64) -> f64 {
        self.terms.iter().map(|t| t.diagonal_value(basis)).sum()
    }

    /// Merge terms with identical operator strings and drop near-zero ones.
    pub fn simplify(self) -> Self {
        let min_qubits = self.min_qubits;
        let mut merged: BTreeMap<Vec<(usize, Pauli)>, f64> = BTreeMap::new();
        for term in self.terms {
            let mut ops: Vec<(usize, Pauli)> = term
                .operators
                .into_iter()
                .filter(|(_, p)| *p != Pauli::I)
                .collect();
            ops.sort();
            *merged.entry(ops).or_insert(0.0) += term.coefficient;
        }
        let terms = merged
            .into_iter()
            .filter(|(_, c)| c.abs() > 1e-12)
            .map(|(ops, c)| PauliTerm::new(c, ops))
            .collect();
        Self { terms, min_qubits }
    }
}

impl fmt::Display for PauliHamiltonian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.num_qubits();
        for (k, term) in self.terms.iter().enumerate() {
            if k > 0 {
                writeln!(f)?;
            }
            write!(f, "{:+.6} * {}", term.coefficient, term.label(n))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_qubits() {
        let h = PauliHamiltonian::new(vec![PauliTerm::identity(1.0), PauliTerm::zz(0.5, 0, 2)]);
        assert_eq!(h.num_qubits(), 3);
        assert_eq!(h.num_terms(), 2);
        assert_eq!(h.clone().with_num_qubits(5).num_qubits(), 5);
        assert!((h.identity_coefficient() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_diagonal_value() {
        let h = PauliHamiltonian::new(vec![
            PauliTerm::identity(-1.0),
            PauliTerm::z(2.0, 0),
            PauliTerm::zz(0.5, 0, 1),
        ]);
        // |00>: -1 + 2 + 0.5
        assert!((h.diagonal_value(0b00) - 1.5).abs() < 1e-12);
        // |01> (qubit 0 set): -1 - 2 - 0.5
        assert!((h.diagonal_value(0b01) + 3.5).abs() < 1e-12);
        // |11>: -1 - 2 + 0.5
        assert!((h.diagonal_value(0b11) + 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_is_diagonal() {
        let diag = PauliHamiltonian::new(vec![PauliTerm::z(1.0, 0)]);
        let mixed = PauliHamiltonian::new(vec![PauliTerm::z(1.0, 0), PauliTerm::xx(1.0, 0, 1)]);
        assert!(diag.is_diagonal());
        assert!(!mixed.is_diagonal());
        assert_eq!(mixed.first_non_diagonal().unwrap().label(2), "XX");
    }

    #[test]
    fn test_simplify_merges() {
        let h = PauliHamiltonian::new(vec![
            PauliTerm::zz(1.0, 1, 0),
            PauliTerm::zz(0.5, 0, 1),
            PauliTerm::z(1.0, 2),
            PauliTerm::z(-1.0, 2),
        ])
        .simplify();
        assert_eq!(h.num_terms(), 1);
        assert!((h.terms[0].coefficient - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_label() {
        assert_eq!(PauliTerm::z(1.0, 0).label(3), "IIZ");
        assert_eq!(PauliTerm::zz(1.0, 0, 2).label(3), "ZIZ");
    }
}
