//! Micro-benchmark harness for knapsack solvers.
//!
//! Each grid point ([`BenchParams`]) gets a seeded random knapsack and a
//! single-shot simulator context. Four operations are timed against it:
//!
//! - `generate_qubo`: knapsack -> quadratic program -> QUBO
//! - `qaoa`: [`MinimumEigenOptimizer`](knapq_opt::MinimumEigenOptimizer) over QAOA
//! - `vqe`: the same over VQE with an `EfficientSU2` ansatz
//! - `grover`: Grover adaptive search
//!
//! ```no_run
//! use knapq_bench::{BenchParams, HarnessConfig, KnapsackBenchmarks};
//!
//! let bench = KnapsackBenchmarks::setup(BenchParams::new(3, 8), &HarnessConfig::default())?;
//! let result = bench.solve_qaoa()?;
//! println!("{result}");
//! # Ok::<(), knapq_bench::BenchError>(())
//! ```

pub mod config;
pub mod error;
pub mod harness;
pub mod instance;

pub use config::{BenchParams, DEFAULT_SEED, HarnessConfig, ITEM_COUNTS, MAX_WEIGHTS, parameter_grid};
pub use error::{BenchError, BenchResult};
pub use harness::{KnapsackBenchmarks, Operation, OperationOutput};
pub use instance::ProblemInstance;
