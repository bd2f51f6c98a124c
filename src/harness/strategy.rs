//! Execution strategy definitions

use crate::workload::WorkloadKind;

/// Concurrency modes under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionStrategy {
    /// One invocation after another on a single execution context
    Sequential,
    /// Concurrent OS threads sharing one mutual-exclusion token
    LockSharedThreads,
    /// Concurrent OS threads, each with its own private token
    IsolatedWorkers,
    /// Logical tasks multiplexed on one context, suspending at I/O waits
    CooperativeAsync,
    /// Concurrent OS threads with no token at all
    FreeThreadedParallel,
}

impl ExecutionStrategy {
    /// Every strategy, in the canonical comparison order
    pub const ALL: [ExecutionStrategy; 5] = [
        Self::Sequential,
        Self::LockSharedThreads,
        Self::IsolatedWorkers,
        Self::CooperativeAsync,
        Self::FreeThreadedParallel,
    ];

    /// Parse strategy from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sequential" | "seq" => Some(Self::Sequential),
            "lock-shared" | "lock_shared" | "shared" | "threads" => Some(Self::LockSharedThreads),
            "isolated" | "isolated-workers" | "isolated_workers" => Some(Self::IsolatedWorkers),
            "async" | "cooperative" | "cooperative-async" | "cooperative_async" => {
                Some(Self::CooperativeAsync)
            }
            "free-threaded" | "free_threaded" | "freethreaded" => Some(Self::FreeThreadedParallel),
            _ => None,
        }
    }

    /// Get display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "SEQUENTIAL",
            Self::LockSharedThreads => "LOCK-SHARED",
            Self::IsolatedWorkers => "ISOLATED",
            Self::CooperativeAsync => "ASYNC",
            Self::FreeThreadedParallel => "FREE-THREADED",
        }
    }

    /// Strategies that only exist when the runtime reports the capability
    pub fn is_capability_gated(&self) -> bool {
        matches!(self, Self::IsolatedWorkers | Self::FreeThreadedParallel)
    }

    /// Check if the strategy can drive the given workload.
    ///
    /// A cooperative scheduler only switches at suspension points, and the
    /// CPU-bound workload has none, so that combination is rejected rather
    /// than silently degrading to sequential timing.
    pub fn supports_workload(&self, workload: WorkloadKind) -> bool {
        match self {
            Self::CooperativeAsync => workload == WorkloadKind::IoBound,
            _ => true,
        }
    }
}

impl std::fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategies() {
        assert_eq!(
            ExecutionStrategy::parse("sequential"),
            Some(ExecutionStrategy::Sequential)
        );
        assert_eq!(
            ExecutionStrategy::parse("LOCK-SHARED"),
            Some(ExecutionStrategy::LockSharedThreads)
        );
        assert_eq!(
            ExecutionStrategy::parse("isolated_workers"),
            Some(ExecutionStrategy::IsolatedWorkers)
        );
        assert_eq!(
            ExecutionStrategy::parse("async"),
            Some(ExecutionStrategy::CooperativeAsync)
        );
        assert_eq!(
            ExecutionStrategy::parse("free-threaded"),
            Some(ExecutionStrategy::FreeThreadedParallel)
        );
        assert_eq!(ExecutionStrategy::parse("unknown"), None);
    }

    #[test]
    fn test_capability_gating() {
        assert!(!ExecutionStrategy::Sequential.is_capability_gated());
        assert!(!ExecutionStrategy::LockSharedThreads.is_capability_gated());
        assert!(!ExecutionStrategy::CooperativeAsync.is_capability_gated());
        assert!(ExecutionStrategy::IsolatedWorkers.is_capability_gated());
        assert!(ExecutionStrategy::FreeThreadedParallel.is_capability_gated());
    }

    #[test]
    fn test_supports_workload() {
        assert!(ExecutionStrategy::Sequential.supports_workload(WorkloadKind::CpuBound));
        assert!(ExecutionStrategy::LockSharedThreads.supports_workload(WorkloadKind::CpuBound));
        assert!(ExecutionStrategy::CooperativeAsync.supports_workload(WorkloadKind::IoBound));
        assert!(!ExecutionStrategy::CooperativeAsync.supports_workload(WorkloadKind::CpuBound));
    }
}
