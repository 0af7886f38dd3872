//! Parallel execution of per-file work
//!
//! Resource discovery (`num_cpus`), worker-count calculation and the
//! crossbeam worker pool. Knows nothing about searching beyond reporting
//! failed items to a [`crate::search::SearchListener`].

pub mod processor;

pub use processor::{ExecutionStrategy, ParallelConfig, ParallelProcessor};
