//! Workload execution under a token regime
//!
//! Each worker owns its state exclusively. The only synchronization points
//! are the run counters and, under a lock-sharing strategy, the
//! mutual-exclusion token itself.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use super::counters::RunCounters;
use crate::workload::{cpu, io_wait, WorkloadKind};

/// How a worker relates to the mutual-exclusion token
#[derive(Clone)]
pub enum TokenMode {
    /// All workers contend on one shared token
    Shared(Arc<Mutex<()>>),
    /// Each worker holds its own private token
    Private,
    /// No token at all
    None,
}

/// Outcome of one worker
#[derive(Debug, Clone)]
pub struct WorkerOutcome {
    /// Worker ID
    pub worker_id: usize,
    /// Wall-clock time from start to completion of this worker
    pub elapsed: Duration,
    /// Workload output (zero for I/O-bound work)
    pub checksum: u64,
    /// Whether the workload ran to completion
    pub completed: bool,
}

/// One workload invocation bound to a token regime
pub struct Worker {
    id: usize,
    workload: WorkloadKind,
    work_size: u64,
    token: Option<Arc<Mutex<()>>>,
}

impl Worker {
    pub fn new(id: usize, workload: WorkloadKind, work_size: u64, mode: &TokenMode) -> Self {
        let token = match mode {
            TokenMode::Shared(t) => Some(Arc::clone(t)),
            TokenMode::Private => Some(Arc::new(Mutex::new(()))),
            TokenMode::None => None,
        };
        Self {
            id,
            workload,
            work_size,
            token,
        }
    }

    /// Run the workload to completion, or until the run deadline expires.
    pub fn run(self, counters: &RunCounters) -> WorkerOutcome {
        debug!(
            "worker {} starting on {:?}",
            self.id,
            std::thread::current().id()
        );

        let start = Instant::now();
        let token = self.token.as_deref();

        let (checksum, completed) = match self.workload {
            WorkloadKind::CpuBound => match cpu::run(self.work_size, token, counters) {
                Some(sum) => (sum, true),
                None => (0, false),
            },
            WorkloadKind::IoBound => {
                if counters.is_deadline_exceeded() {
                    (0, false)
                } else {
                    io_wait::blocking_wait(Duration::from_millis(self.work_size), token);
                    counters.record_slice();
                    (0, true)
                }
            }
        };

        if completed {
            counters.record_worker_done();
        }

        WorkerOutcome {
            worker_id: self.id,
            elapsed: start.elapsed(),
            checksum,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_worker_produces_checksum() {
        let counters = RunCounters::new();
        let worker = Worker::new(0, WorkloadKind::CpuBound, 50_000, &TokenMode::None);
        let outcome = worker.run(&counters);

        assert!(outcome.completed);
        assert_eq!(outcome.worker_id, 0);
        assert_eq!(outcome.checksum, cpu::expected_checksum(50_000));
        assert_eq!(counters.completed(), 1);
    }

    #[test]
    fn test_private_token_worker_completes() {
        let counters = RunCounters::new();
        let worker = Worker::new(0, WorkloadKind::CpuBound, 150_000, &TokenMode::Private);
        let outcome = worker.run(&counters);

        assert!(outcome.completed);
        assert_eq!(outcome.checksum, cpu::expected_checksum(150_000));
    }

    #[test]
    fn test_io_worker_on_expired_deadline_does_not_complete() {
        let counters = RunCounters::with_deadline(Duration::ZERO);
        let worker = Worker::new(0, WorkloadKind::IoBound, 10, &TokenMode::None);
        let outcome = worker.run(&counters);

        assert!(!outcome.completed);
        assert_eq!(counters.completed(), 0);
    }
}
