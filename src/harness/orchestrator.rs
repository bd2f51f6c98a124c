//! Benchmark orchestrator
//!
//! Executes a workload under a selected strategy, collects per-worker
//! outcomes, and produces the timing evidence used for cross-strategy
//! comparison.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use hdrhistogram::Histogram;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use tracing::{debug, info};

use super::counters::RunCounters;
use super::strategy::ExecutionStrategy;
use super::worker::{TokenMode, Worker, WorkerOutcome};
use crate::capability::CapabilityReport;
use crate::utils::{HarnessError, Result};
use crate::workload::cpu::INSTRUCTION_SLICE;
use crate::workload::{io_wait, WorkloadKind};

/// Result of a single run
///
/// Immutable once produced. A RunResult is only built when every worker
/// ran to completion; partial runs surface as errors instead.
pub struct RunResult {
    /// Strategy the run executed under
    pub strategy: ExecutionStrategy,
    /// Workload kind
    pub workload: WorkloadKind,
    /// Requested worker count
    pub worker_count: u32,
    /// Work per worker (iterations or milliseconds, per workload kind)
    pub work_size: u64,
    /// Total wall-clock time for the run
    pub elapsed: Duration,
    /// Workers that ran to completion (== worker_count on success)
    pub completed_workers: u32,
    /// Per-worker completion latencies in microseconds
    pub worker_latency: Histogram<u64>,
    /// Aggregated workload output (keeps the computation observable)
    pub checksum: u64,
}

impl RunResult {
    /// Check whether every worker completed
    pub fn is_success(&self) -> bool {
        self.completed_workers == self.worker_count
    }

    /// Get per-worker percentile latency in microseconds
    pub fn percentile_us(&self, p: f64) -> u64 {
        self.worker_latency.value_at_percentile(p)
    }

    /// Get per-worker percentile latency in milliseconds
    pub fn percentile_ms(&self, p: f64) -> f64 {
        self.percentile_us(p) as f64 / 1000.0
    }
}

/// Per-strategy entry in a comparison
pub enum StrategyOutcome {
    Completed(RunResult),
    Skipped {
        strategy: ExecutionStrategy,
        reason: String,
    },
}

impl StrategyOutcome {
    /// Strategy this entry describes
    pub fn strategy(&self) -> ExecutionStrategy {
        match self {
            Self::Completed(result) => result.strategy,
            Self::Skipped { strategy, .. } => *strategy,
        }
    }

    /// The run result, if the strategy completed
    pub fn as_completed(&self) -> Option<&RunResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Skipped { .. } => None,
        }
    }
}

/// Ordered cross-strategy comparison for one workload
pub struct Comparison {
    pub workload: WorkloadKind,
    pub worker_count: u32,
    pub work_size: u64,
    /// One entry per requested strategy, in caller order
    pub outcomes: Vec<StrategyOutcome>,
}

impl Comparison {
    /// Baseline for speedup computation: the sequential result when it
    /// completed, otherwise the first completed result.
    pub fn baseline(&self) -> Option<&RunResult> {
        self.completed()
            .find(|r| r.strategy == ExecutionStrategy::Sequential)
            .or_else(|| self.completed().next())
    }

    /// Iterate over completed results in report order
    pub fn completed(&self) -> impl Iterator<Item = &RunResult> {
        self.outcomes.iter().filter_map(|o| o.as_completed())
    }

    /// Number of strategies that were skipped
    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.completed().count()
    }
}

/// Benchmark orchestrator
pub struct Orchestrator {
    capabilities: CapabilityReport,
    timeout: Option<Duration>,
    show_progress: bool,
}

impl Orchestrator {
    /// Create an orchestrator for the given capability report
    pub fn new(capabilities: CapabilityReport) -> Self {
        Self {
            capabilities,
            timeout: None,
            show_progress: false,
        }
    }

    /// Set an optional wall-clock ceiling per run
    pub fn with_timeout(mut self, ceiling: Option<Duration>) -> Self {
        self.timeout = ceiling;
        self
    }

    /// Enable progress reporting during runs
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run one workload under one strategy.
    ///
    /// `work_size` is iterations per worker for CPU-bound work and wait
    /// milliseconds per worker for I/O-bound work.
    pub fn run(
        &self,
        workload: WorkloadKind,
        strategy: ExecutionStrategy,
        worker_count: u32,
        work_size: u64,
    ) -> Result<RunResult> {
        self.validate(workload, strategy, worker_count, work_size)?;

        debug!(
            "running {} under {} with {} workers (work size {})",
            workload, strategy, worker_count, work_size
        );

        let counters = Arc::new(match self.timeout {
            Some(ceiling) => RunCounters::with_deadline(ceiling),
            None => RunCounters::new(),
        });
        self.spawn_progress(&counters, total_slices(workload, worker_count, work_size));

        let start = Instant::now();
        let outcomes = match strategy {
            ExecutionStrategy::Sequential => {
                Ok(self.run_sequential(workload, worker_count, work_size, &counters))
            }
            ExecutionStrategy::LockSharedThreads => self.run_threads(
                workload,
                worker_count,
                work_size,
                &counters,
                TokenMode::Shared(Arc::new(Mutex::new(()))),
            ),
            ExecutionStrategy::IsolatedWorkers => {
                self.run_threads(workload, worker_count, work_size, &counters, TokenMode::Private)
            }
            ExecutionStrategy::FreeThreadedParallel => {
                self.run_threads(workload, worker_count, work_size, &counters, TokenMode::None)
            }
            ExecutionStrategy::CooperativeAsync => {
                self.run_async(worker_count, work_size, &counters)
            }
        };
        let elapsed = start.elapsed();

        // Stop the progress reporter and any still-slicing worker
        counters.signal_shutdown();

        self.build_result(
            workload,
            strategy,
            worker_count,
            work_size,
            elapsed,
            outcomes?,
            &counters,
        )
    }

    /// Run one workload under each requested strategy, in caller order.
    ///
    /// Strategy-local failures (unsupported strategy, workload mismatch,
    /// timeout) become skip notices instead of aborting the comparison.
    pub fn compare(
        &self,
        workload: WorkloadKind,
        strategies: &[ExecutionStrategy],
        worker_count: u32,
        work_size: u64,
    ) -> Result<Comparison> {
        let mut outcomes = Vec::with_capacity(strategies.len());

        for &strategy in strategies {
            match self.run(workload, strategy, worker_count, work_size) {
                Ok(result) => {
                    info!(
                        "{} under {}: {:.3}s ({}/{} workers)",
                        workload,
                        strategy,
                        result.elapsed.as_secs_f64(),
                        result.completed_workers,
                        result.worker_count
                    );
                    outcomes.push(StrategyOutcome::Completed(result));
                }
                Err(e) if e.is_strategy_local() => {
                    info!("skipping {} for {}: {}", strategy, workload, e);
                    outcomes.push(StrategyOutcome::Skipped {
                        strategy,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Comparison {
            workload,
            worker_count,
            work_size,
            outcomes,
        })
    }

    fn validate(
        &self,
        workload: WorkloadKind,
        strategy: ExecutionStrategy,
        worker_count: u32,
        work_size: u64,
    ) -> Result<()> {
        if worker_count == 0 {
            return Err(HarnessError::InvalidParameter(
                "worker_count must be positive".to_string(),
            ));
        }
        if work_size == 0 {
            return Err(HarnessError::InvalidParameter(
                "work_size must be positive".to_string(),
            ));
        }
        if !self.capabilities.supports(strategy) {
            return Err(HarnessError::UnsupportedStrategy { strategy });
        }
        if !strategy.supports_workload(workload) {
            return Err(HarnessError::WorkloadStrategyMismatch { strategy, workload });
        }
        Ok(())
    }

    /// Run all invocations back-to-back on the calling thread
    fn run_sequential(
        &self,
        workload: WorkloadKind,
        worker_count: u32,
        work_size: u64,
        counters: &Arc<RunCounters>,
    ) -> Vec<WorkerOutcome> {
        let mut outcomes = Vec::with_capacity(worker_count as usize);
        for worker_id in 0..worker_count as usize {
            if counters.is_deadline_exceeded() {
                break;
            }
            let worker = Worker::new(worker_id, workload, work_size, &TokenMode::None);
            outcomes.push(worker.run(counters));
        }
        outcomes
    }

    /// Run one OS thread per worker under the given token regime
    fn run_threads(
        &self,
        workload: WorkloadKind,
        worker_count: u32,
        work_size: u64,
        counters: &Arc<RunCounters>,
        mode: TokenMode,
    ) -> Result<Vec<WorkerOutcome>> {
        let mut handles = Vec::with_capacity(worker_count as usize);

        for worker_id in 0..worker_count as usize {
            let worker = Worker::new(worker_id, workload, work_size, &mode);
            let counters = Arc::clone(counters);
            let worker_counters = Arc::clone(&counters);

            let handle = thread::Builder::new()
                .name(format!("worker-{}", worker_id))
                .spawn(move || worker.run(&worker_counters));

            match handle {
                Ok(h) => handles.push(h),
                Err(e) => {
                    // Wind down the workers already running before bailing
                    counters.signal_shutdown();
                    for h in handles {
                        let _ = h.join();
                    }
                    return Err(HarnessError::Worker(format!(
                        "failed to spawn worker thread: {}",
                        e
                    )));
                }
            }
        }

        let mut outcomes = Vec::with_capacity(worker_count as usize);
        for (worker_id, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(outcome) => outcomes.push(outcome),
                Err(_) => {
                    counters.record_error();
                    return Err(HarnessError::Worker(format!(
                        "worker thread {} panicked",
                        worker_id
                    )));
                }
            }
        }
        Ok(outcomes)
    }

    /// Run all workers as tasks on a single-threaded async runtime
    fn run_async(
        &self,
        worker_count: u32,
        work_size: u64,
        counters: &Arc<RunCounters>,
    ) -> Result<Vec<WorkerOutcome>> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| HarnessError::Worker(format!("failed to build async runtime: {}", e)))?;

        let wait = Duration::from_millis(work_size);
        let ceiling = self.timeout;

        let outcomes = rt.block_on(async {
            let gather = async {
                let mut tasks = tokio::task::JoinSet::new();
                for worker_id in 0..worker_count as usize {
                    let counters = Arc::clone(counters);
                    tasks.spawn(async move {
                        let start = Instant::now();
                        io_wait::cooperative_wait(wait).await;
                        counters.record_slice();
                        counters.record_worker_done();
                        WorkerOutcome {
                            worker_id,
                            elapsed: start.elapsed(),
                            checksum: 0,
                            completed: true,
                        }
                    });
                }

                let mut outcomes = Vec::with_capacity(worker_count as usize);
                while let Some(joined) = tasks.join_next().await {
                    match joined {
                        Ok(outcome) => outcomes.push(outcome),
                        Err(_) => counters.record_error(),
                    }
                }
                outcomes
            };

            match ceiling {
                // Dropping the JoinSet on expiry aborts the pending tasks
                Some(limit) => tokio::time::timeout(limit, gather).await.unwrap_or_default(),
                None => gather.await,
            }
        });

        Ok(outcomes)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_result(
        &self,
        workload: WorkloadKind,
        strategy: ExecutionStrategy,
        worker_count: u32,
        work_size: u64,
        elapsed: Duration,
        outcomes: Vec<WorkerOutcome>,
        counters: &RunCounters,
    ) -> Result<RunResult> {
        let completed_workers = outcomes.iter().filter(|o| o.completed).count() as u32;

        // A run either fully completes or reports an error
        if completed_workers < worker_count {
            if let Some(ceiling) = self.timeout {
                if counters.is_deadline_exceeded() {
                    return Err(HarnessError::Timeout(ceiling));
                }
            }
            return Err(HarnessError::Worker(format!(
                "{} of {} workers failed to complete",
                worker_count - completed_workers,
                worker_count
            )));
        }

        let mut worker_latency =
            Histogram::new_with_bounds(1, 3_600_000_000, 3).expect("histogram");
        let mut checksum = 0u64;
        for outcome in &outcomes {
            let us = (outcome.elapsed.as_micros() as u64).max(1);
            worker_latency.record(us).ok();
            checksum = checksum.wrapping_add(outcome.checksum);
        }

        Ok(RunResult {
            strategy,
            workload,
            worker_count,
            work_size,
            elapsed,
            completed_workers,
            worker_latency,
            checksum,
        })
    }

    fn spawn_progress(&self, counters: &Arc<RunCounters>, total: u64) {
        if !self.show_progress {
            return;
        }
        let counters = Arc::clone(counters);
        thread::spawn(move || Self::report_progress(&counters, total));
    }

    /// Report slice progress until the run completes or shuts down
    fn report_progress(counters: &RunCounters, total: u64) {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );

        let start = Instant::now();
        let mut last_done = 0u64;
        let mut last_time = start;

        loop {
            let (_, slices) = counters.progress();
            pb.set_position(slices);

            let now = Instant::now();
            let interval = now.duration_since(last_time).as_secs_f64();
            if interval >= 0.5 {
                let rate = (slices - last_done) as f64 / interval;
                pb.set_message(format!("{} slices/s", rate as u64));
                last_done = slices;
                last_time = now;
            }

            if counters.is_shutdown() || slices >= total {
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }

        pb.finish_and_clear();
    }
}

/// Total progress units for a run: instruction slices for CPU-bound work,
/// one wait per worker for I/O-bound work.
fn total_slices(workload: WorkloadKind, worker_count: u32, work_size: u64) -> u64 {
    match workload {
        WorkloadKind::CpuBound => worker_count as u64 * work_size.div_ceil(INSTRUCTION_SLICE),
        WorkloadKind::IoBound => worker_count as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::detect_capabilities;
    use crate::workload::cpu;

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(CapabilityReport::full(8))
    }

    #[test]
    fn test_invalid_worker_count() {
        let err = orchestrator()
            .run(WorkloadKind::CpuBound, ExecutionStrategy::Sequential, 0, 1000)
            .err()
            .unwrap();
        assert!(matches!(err, HarnessError::InvalidParameter(_)));
    }

    #[test]
    fn test_invalid_work_size() {
        let err = orchestrator()
            .run(WorkloadKind::IoBound, ExecutionStrategy::Sequential, 2, 0)
            .err()
            .unwrap();
        assert!(matches!(err, HarnessError::InvalidParameter(_)));
    }

    #[test]
    fn test_unsupported_strategy() {
        let caps = CapabilityReport::new(1, vec![ExecutionStrategy::Sequential]);
        let err = Orchestrator::new(caps)
            .run(
                WorkloadKind::CpuBound,
                ExecutionStrategy::FreeThreadedParallel,
                2,
                1000,
            )
            .err()
            .unwrap();
        assert!(matches!(err, HarnessError::UnsupportedStrategy { .. }));
    }

    #[test]
    fn test_async_rejects_cpu_bound() {
        let err = orchestrator()
            .run(
                WorkloadKind::CpuBound,
                ExecutionStrategy::CooperativeAsync,
                2,
                1000,
            )
            .err()
            .unwrap();
        assert!(matches!(err, HarnessError::WorkloadStrategyMismatch { .. }));
    }

    #[test]
    fn test_sequential_io_completes_all_workers() {
        let result = orchestrator()
            .run(WorkloadKind::IoBound, ExecutionStrategy::Sequential, 3, 10)
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.completed_workers, 3);
        // Three back-to-back 10ms waits
        assert!(result.elapsed >= Duration::from_millis(30));
    }

    #[test]
    fn test_cpu_checksum_is_deterministic() {
        let result = orchestrator()
            .run(WorkloadKind::CpuBound, ExecutionStrategy::Sequential, 2, 1000)
            .unwrap();
        assert_eq!(result.checksum, cpu::expected_checksum(1000).wrapping_mul(2));

        let again = orchestrator()
            .run(WorkloadKind::CpuBound, ExecutionStrategy::Sequential, 2, 1000)
            .unwrap();
        // Elapsed time varies between runs; completion evidence must not
        assert_eq!(again.completed_workers, result.completed_workers);
        assert_eq!(again.checksum, result.checksum);
    }

    #[test]
    fn test_lock_shared_io_waits_overlap() {
        let result = orchestrator()
            .run(
                WorkloadKind::IoBound,
                ExecutionStrategy::LockSharedThreads,
                4,
                40,
            )
            .unwrap();

        assert!(result.is_success());
        // Sequential would take ~160ms; shared-token threads release the
        // token for the wait, so the four waits overlap
        assert!(
            result.elapsed < Duration::from_millis(96),
            "waits did not overlap: {:?}",
            result.elapsed
        );
    }

    #[test]
    fn test_cooperative_async_io_overlaps() {
        let result = orchestrator()
            .run(
                WorkloadKind::IoBound,
                ExecutionStrategy::CooperativeAsync,
                8,
                30,
            )
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.completed_workers, 8);
        // Sequential would take ~240ms
        assert!(
            result.elapsed < Duration::from_millis(120),
            "tasks did not overlap: {:?}",
            result.elapsed
        );
    }

    #[test]
    fn test_lock_shared_cpu_gets_no_speedup() {
        let orch = orchestrator();
        let work = 5_000_000;

        let sequential = orch
            .run(WorkloadKind::CpuBound, ExecutionStrategy::Sequential, 4, work)
            .unwrap();
        let lock_shared = orch
            .run(
                WorkloadKind::CpuBound,
                ExecutionStrategy::LockSharedThreads,
                4,
                work,
            )
            .unwrap();

        assert_eq!(lock_shared.checksum, sequential.checksum);
        // True 4-way parallelism would land near 0.25x sequential; a shared
        // token keeps computation serialized
        assert!(
            lock_shared.elapsed.as_secs_f64() >= 0.5 * sequential.elapsed.as_secs_f64(),
            "shared token must not parallelize CPU work: lock-shared {:?} vs sequential {:?}",
            lock_shared.elapsed,
            sequential.elapsed
        );
    }

    #[test]
    fn test_isolated_workers_beat_sequential_on_cpu() {
        let caps = detect_capabilities();
        if !caps.supports(ExecutionStrategy::IsolatedWorkers) {
            return; // single hardware thread: nothing to measure
        }

        let orch = Orchestrator::new(caps);
        let work = 20_000_000;

        let sequential = orch
            .run(WorkloadKind::CpuBound, ExecutionStrategy::Sequential, 4, work)
            .unwrap();
        let isolated = orch
            .run(
                WorkloadKind::CpuBound,
                ExecutionStrategy::IsolatedWorkers,
                4,
                work,
            )
            .unwrap();

        assert_eq!(isolated.checksum, sequential.checksum);
        assert!(
            isolated.elapsed.as_secs_f64() < 0.9 * sequential.elapsed.as_secs_f64(),
            "isolated workers showed no speedup: isolated {:?} vs sequential {:?}",
            isolated.elapsed,
            sequential.elapsed
        );
    }

    #[test]
    fn test_free_threaded_completes_with_checksum() {
        let result = orchestrator()
            .run(
                WorkloadKind::CpuBound,
                ExecutionStrategy::FreeThreadedParallel,
                3,
                200_000,
            )
            .unwrap();

        assert!(result.is_success());
        assert_eq!(
            result.checksum,
            cpu::expected_checksum(200_000).wrapping_mul(3)
        );
    }

    #[test]
    fn test_timeout_aborts_cpu_run() {
        let orch = orchestrator().with_timeout(Some(Duration::from_millis(50)));
        let err = orch
            .run(
                WorkloadKind::CpuBound,
                ExecutionStrategy::Sequential,
                1,
                5_000_000_000,
            )
            .err()
            .unwrap();
        assert!(matches!(err, HarnessError::Timeout(_)));
    }

    #[test]
    fn test_compare_preserves_order_and_skips_unsupported() {
        let caps = CapabilityReport::new(
            8,
            vec![
                ExecutionStrategy::Sequential,
                ExecutionStrategy::LockSharedThreads,
            ],
        );
        let orch = Orchestrator::new(caps);

        let cmp = orch
            .compare(
                WorkloadKind::IoBound,
                &[
                    ExecutionStrategy::FreeThreadedParallel,
                    ExecutionStrategy::Sequential,
                    ExecutionStrategy::LockSharedThreads,
                ],
                2,
                10,
            )
            .unwrap();

        assert_eq!(cmp.outcomes.len(), 3);
        assert_eq!(
            cmp.outcomes[0].strategy(),
            ExecutionStrategy::FreeThreadedParallel
        );
        assert!(cmp.outcomes[0].as_completed().is_none());
        assert!(cmp.outcomes[1].as_completed().is_some());
        assert!(cmp.outcomes[2].as_completed().is_some());
        assert_eq!(cmp.skipped_count(), 1);
    }

    #[test]
    fn test_compare_records_mismatch_as_skip() {
        let cmp = orchestrator()
            .compare(
                WorkloadKind::CpuBound,
                &[
                    ExecutionStrategy::Sequential,
                    ExecutionStrategy::CooperativeAsync,
                ],
                2,
                1000,
            )
            .unwrap();

        assert!(cmp.outcomes[0].as_completed().is_some());
        match &cmp.outcomes[1] {
            StrategyOutcome::Skipped { strategy, reason } => {
                assert_eq!(*strategy, ExecutionStrategy::CooperativeAsync);
                assert!(reason.contains("cannot drive"));
            }
            StrategyOutcome::Completed(_) => panic!("expected a skip notice"),
        }
    }

    #[test]
    fn test_compare_aborts_on_invalid_parameter() {
        let err = orchestrator()
            .compare(
                WorkloadKind::CpuBound,
                &[ExecutionStrategy::Sequential],
                0,
                1000,
            )
            .err()
            .unwrap();
        assert!(matches!(err, HarnessError::InvalidParameter(_)));
    }

    #[test]
    fn test_baseline_prefers_sequential() {
        let cmp = orchestrator()
            .compare(
                WorkloadKind::IoBound,
                &[
                    ExecutionStrategy::LockSharedThreads,
                    ExecutionStrategy::Sequential,
                ],
                2,
                10,
            )
            .unwrap();

        let baseline = cmp.baseline().expect("baseline");
        assert_eq!(baseline.strategy, ExecutionStrategy::Sequential);
    }

    #[test]
    fn test_total_slices() {
        assert_eq!(total_slices(WorkloadKind::IoBound, 8, 100), 8);
        assert_eq!(
            total_slices(WorkloadKind::CpuBound, 2, INSTRUCTION_SLICE + 1),
            4
        );
    }
}
