//! CPU-bound workload: a deterministic arithmetic reduction
//!
//! The reduction runs in fixed-size instruction slices. A worker holds the
//! mutual-exclusion token for the duration of each slice and releases it
//! between slices, so token handoff happens at slice granularity, never
//! inside a slice. The workload itself never suspends voluntarily.

use parking_lot::Mutex;

use crate::harness::RunCounters;

/// Iterations retired per token hold
pub const INSTRUCTION_SLICE: u64 = 100_000;

/// One slice of the reduction: accumulates i*i over [start, start + len)
#[inline]
pub fn reduce_slice(acc: u64, start: u64, len: u64) -> u64 {
    let mut acc = acc;
    for i in start..start + len {
        acc = acc.wrapping_add(i.wrapping_mul(i));
    }
    acc
}

/// Run the full reduction of `work_size` iterations, taking the token (when
/// present) once per slice.
///
/// Returns the checksum, or `None` if the run deadline expired or shutdown
/// was signaled before the reduction finished.
pub fn run(work_size: u64, token: Option<&Mutex<()>>, counters: &RunCounters) -> Option<u64> {
    let mut acc = 0u64;
    let mut done = 0u64;

    while done < work_size {
        if counters.is_deadline_exceeded() || counters.is_shutdown() {
            return None;
        }

        let len = INSTRUCTION_SLICE.min(work_size - done);
        acc = match token {
            Some(t) => {
                let _held = t.lock();
                reduce_slice(acc, done, len)
            }
            None => reduce_slice(acc, done, len),
        };
        done += len;
        counters.record_slice();

        // Give a waiting context a chance at the token before reacquiring
        std::thread::yield_now();
    }

    Some(acc)
}

/// Checksum a complete reduction of `work_size` iterations must produce
pub fn expected_checksum(work_size: u64) -> u64 {
    reduce_slice(0, 0, work_size)
}
