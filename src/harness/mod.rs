//! Benchmark orchestration and workers
//!
//! This module provides the strategy-driven execution system:
//! - RunCounters: atomic counters shared by the contexts of one run
//! - Worker: runs one workload invocation under a token regime
//! - Orchestrator: executes runs and cross-strategy comparisons

pub mod counters;
pub mod orchestrator;
pub mod strategy;
pub mod worker;

pub use counters::RunCounters;
pub use orchestrator::{Comparison, Orchestrator, RunResult, StrategyOutcome};
pub use strategy::ExecutionStrategy;
pub use worker::{TokenMode, Worker, WorkerOutcome};
