//! Hardware-efficient `RY`/`RZ` ansatz with CX entanglers.

use knapq_ir::{Circuit, QubitId};
use serde::{Deserialize, Serialize};

use crate::error::{OptError, OptResult};

/// Which qubit pairs receive a CX in each entangling layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entanglement {
    /// Every pair `(i, j)` with `i < j`.
    Full,
    /// `(0, 1), (1, 2), ...`
    Linear,
    /// The linear chain applied back to front.
    #[default]
    ReverseLinear,
    /// The linear chain preceded by `(n-1, 0)`.
    Circular,
}

impl Entanglement {
    /// Control/target pairs for `n` qubits, in application order.
    pub fn pairs(self, n: usize) -> Vec<(usize, usize)> {
        if n < 2 {
            return Vec::new();
        }
        let linear = (0..n - 1).map(|i| (i, i + 1));
        match self {
            Entanglement::Full => (0..n)
                .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
                .collect(),
            Entanglement::Linear => linear.collect(),
            Entanglement::ReverseLinear => linear.rev().collect(),
            Entanglement::Circular if n > 2 => {
                std::iter::once((n - 1, 0)).chain(linear).collect()
            }
            Entanglement::Circular => linear.collect(),
        }
    }
}

/// `reps` blocks of (`RY` layer, `RZ` layer, entangler), closed by a final
/// rotation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficientSu2 {
    pub reps: usize,
    pub entanglement: Entanglement,
    pub skip_final_rotation_layer: bool,
}

impl Default for EfficientSu2 {
    fn default() -> Self {
        Self {
            reps: 3,
            entanglement: Entanglement::default(),
            skip_final_rotation_layer: false,
        }
    }
}

impl EfficientSu2 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reps(mut self, reps: usize) -> Self {
        self.reps = reps;
        self
    }

    pub fn with_entanglement(mut self, entanglement: Entanglement) -> Self {
        self.entanglement = entanglement;
        self
    }

    pub fn with_skip_final_rotation_layer(mut self, skip: bool) -> Self {
        self.skip_final_rotation_layer = skip;
        self
    }

    fn num_rotation_layers(&self) -> usize {
        if self.skip_final_rotation_layer {
            self.reps
        } else {
            self.reps + 1
        }
    }

    pub fn num_parameters(&self, num_qubits: usize) -> usize {
        2 * num_qubits * self.num_rotation_layers()
    }

    /// Bind `params` and build the circuit over `num_qubits` qubits.
    ///
    /// Within a rotation layer the first `n` parameters feed the `RY` gates
    /// and the next `n` the `RZ` gates.
    pub fn build(&self, num_qubits: usize, params: &[f64]) -> OptResult<Circuit> {
        let expected = self.num_parameters(num_qubits);
        if params.len() != expected {
            return Err(OptError::ParameterCountMismatch {
                expected,
                got: params.len(),
            });
        }

        let mut circuit = Circuit::with_size("efficient_su2", num_qubits as u32, 0);
        let pairs = self.entanglement.pairs(num_qubits);
        let mut layers = params.chunks(2 * num_qubits.max(1));

        for rep in 0..self.num_rotation_layers() {
            if let Some(layer) = layers.next() {
                let (ry, rz) = layer.split_at(num_qubits);
                for (q, theta) in ry.iter().enumerate() {
                    circuit.ry(*theta, QubitId::from(q))?;
                }
                for (q, theta) in rz.iter().enumerate() {
                    circuit.rz(*theta, QubitId::from(q))?;
                }
            }
            if rep < self.reps {
                for &(c, t) in &pairs {
                    circuit.cx(QubitId::from(c), QubitId::from(t))?;
                }
            }
        }
        Ok(circuit)
    }
}
