//! Concurrency Module
//!
//! Bounded-concurrency execution of independent async tasks.

mod runner;

pub use runner::{
    filter_concurrently, map_concurrently, run_batch, run_in_batches, BatchReport,
    RunnerOptions, TaskFailure, DEFAULT_CONCURRENCY,
};
