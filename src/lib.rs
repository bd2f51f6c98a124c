//! lockbench library
//!
//! Experiment harness comparing concurrency strategies for CPU-bound and
//! I/O-bound workloads under different mutual-exclusion regimes.

pub mod capability;
pub mod config;
pub mod harness;
pub mod report;
pub mod utils;
pub mod workload;
