//! Backend abstraction for knapq.
//!
//! Backends execute [`knapq_ir::Circuit`]s and report either sampled
//! [`Counts`] or an exact [`Distribution`]. Algorithms never talk to a
//! backend directly; they go through a [`QuantumInstance`], which carries the
//! shot count and simulator seed for a whole benchmark run.

pub mod backend;
pub mod error;
pub mod instance;
pub mod result;

pub use backend::{Backend, Capabilities, ExecutionResult, RunConfig};
pub use error::{HalError, HalResult};
pub use instance::QuantumInstance;
pub use result::{Counts, Distribution};
