//! Global atomic counters for a single run
//!
//! These are the only synchronization points between execution contexts
//! besides the mutual-exclusion token itself. All other state is
//! context-local.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters shared between all contexts of one run
///
/// Design principle: minimize contention by using relaxed ordering and
/// keeping counter operations simple (fetch_add).
pub struct RunCounters {
    /// Instruction slices retired across all contexts (I/O waits count one)
    pub slices_done: AtomicU64,

    /// Workers that ran their workload to completion
    pub workers_completed: AtomicU64,

    /// Workers that failed
    pub error_count: AtomicU64,

    /// Shutdown signal (stops the progress reporter and aborts slicing)
    pub shutdown: AtomicBool,

    /// Run start time
    start_time: Instant,

    /// Optional wall-clock ceiling for the whole run
    deadline: Option<Duration>,
}

impl RunCounters {
    fn base() -> Self {
        Self {
            slices_done: AtomicU64::new(0),
            workers_completed: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
            start_time: Instant::now(),
            deadline: None,
        }
    }

    /// Create new counters with no wall-clock ceiling
    pub fn new() -> Self {
        Self::base()
    }

    /// Create counters that expire after the given ceiling
    pub fn with_deadline(ceiling: Duration) -> Self {
        Self {
            deadline: Some(ceiling),
            ..Self::base()
        }
    }

    /// Check if the wall-clock ceiling has been exceeded
    #[inline]
    pub fn is_deadline_exceeded(&self) -> bool {
        match self.deadline {
            Some(limit) => self.start_time.elapsed() >= limit,
            None => false,
        }
    }

    /// Record one retired instruction slice
    #[inline]
    pub fn record_slice(&self) {
        self.slices_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one worker that ran to completion
    #[inline]
    pub fn record_worker_done(&self) {
        self.workers_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed worker
    #[inline]
    pub fn record_error(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Signal shutdown to all contexts
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Check if shutdown has been signaled
    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Get current progress as (workers completed, slices retired)
    pub fn progress(&self) -> (u64, u64) {
        (
            self.workers_completed.load(Ordering::Relaxed),
            self.slices_done.load(Ordering::Relaxed),
        )
    }

    /// Get completed worker count
    pub fn completed(&self) -> u64 {
        self.workers_completed.load(Ordering::Relaxed)
    }

    /// Get error count
    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }
}

impl Default for RunCounters {
    fn default() -> Self {
        Self::new()
    }
}
