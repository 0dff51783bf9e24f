//! Classical optimizers for the variational loop.

pub mod cobyla;

pub use cobyla::{Cobyla, OptimizerResult};

use crate::error::OptResult;

/// A derivative-free minimizer.
pub trait Optimizer {
    /// Minimize `objective` starting from `initial_params`.
    ///
    /// The first error returned by `objective` aborts the run and is
    /// propagated unchanged.
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> OptResult<OptimizerResult>
    where
        F: FnMut(&[f64]) -> OptResult<f64>;
}
