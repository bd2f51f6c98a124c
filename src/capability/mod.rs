//! Runtime capability detection
//!
//! The harness never probes the runtime inline. Capabilities are detected
//! once at start-up and handed to the orchestrator as read-only
//! configuration, which keeps runs reproducible and the harness testable
//! with a fixed report.

use std::thread;

use tracing::debug;

use crate::harness::ExecutionStrategy;
use crate::workload::WorkloadKind;

/// Which execution strategies the current runtime supports
#[derive(Debug, Clone)]
pub struct CapabilityReport {
    /// Hardware threads the host exposes
    pub hardware_threads: usize,
    supported: Vec<ExecutionStrategy>,
}

impl CapabilityReport {
    /// Build a report from an explicit strategy list
    pub fn new(hardware_threads: usize, supported: Vec<ExecutionStrategy>) -> Self {
        Self {
            hardware_threads,
            supported,
        }
    }

    /// Report claiming support for every strategy, hardware gating skipped
    pub fn full(hardware_threads: usize) -> Self {
        Self::new(hardware_threads, ExecutionStrategy::ALL.to_vec())
    }

    /// Check whether a strategy is available
    pub fn supports(&self, strategy: ExecutionStrategy) -> bool {
        self.supported.contains(&strategy)
    }

    /// Strategies available on this runtime
    pub fn supported(&self) -> &[ExecutionStrategy] {
        &self.supported
    }

    /// Suggested strategy for a workload kind on this runtime
    pub fn recommendation(&self, workload: WorkloadKind) -> String {
        match workload {
            WorkloadKind::CpuBound => {
                if self.supports(ExecutionStrategy::FreeThreadedParallel)
                    || self.supports(ExecutionStrategy::IsolatedWorkers)
                {
                    "free-threaded or isolated workers (compute scales with cores)".to_string()
                } else {
                    "sequential (one hardware thread; a shared token adds overhead without speedup)"
                        .to_string()
                }
            }
            WorkloadKind::IoBound => {
                "cooperative async for many concurrent waits, lock-shared threads otherwise"
                    .to_string()
            }
        }
    }

    /// Print a human-readable capability summary with recommendations
    pub fn print(&self) {
        println!("Hardware threads: {}", self.hardware_threads);
        println!("Strategies:");
        for strategy in ExecutionStrategy::ALL {
            let status = if self.supports(strategy) {
                "supported"
            } else {
                "unavailable (needs >= 2 hardware threads)"
            };
            println!("  {:<14} {}", strategy.as_str(), status);
        }
        println!("\nRecommendations:");
        for workload in [WorkloadKind::CpuBound, WorkloadKind::IoBound] {
            println!("  {:<10} {}", workload.as_str(), self.recommendation(workload));
        }
    }
}

/// Detect which strategies the current runtime supports.
///
/// Single-context strategies and shared-token threading always work. The
/// truly parallel strategies are only reported when the host exposes more
/// than one hardware thread, since they cannot demonstrate a speedup
/// otherwise.
pub fn detect_capabilities() -> CapabilityReport {
    let hardware_threads = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    let supported: Vec<ExecutionStrategy> = ExecutionStrategy::ALL
        .into_iter()
        .filter(|s| !s.is_capability_gated() || hardware_threads >= 2)
        .collect();

    debug!(
        "detected {} hardware threads, {} strategies supported",
        hardware_threads,
        supported.len()
    );

    CapabilityReport::new(hardware_threads, supported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_always_includes_single_context_strategies() {
        let report = detect_capabilities();
        assert!(report.supports(ExecutionStrategy::Sequential));
        assert!(report.supports(ExecutionStrategy::LockSharedThreads));
        assert!(report.supports(ExecutionStrategy::CooperativeAsync));
        assert!(report.supported().len() >= 3);
        assert!(report.hardware_threads >= 1);
    }

    #[test]
    fn test_full_report_supports_everything() {
        let report = CapabilityReport::full(1);
        for strategy in ExecutionStrategy::ALL {
            assert!(report.supports(strategy));
        }
    }

    #[test]
    fn test_gated_strategies_follow_hardware_threads() {
        let single = CapabilityReport::new(
            1,
            ExecutionStrategy::ALL
                .into_iter()
                .filter(|s| !s.is_capability_gated())
                .collect(),
        );
        assert!(!single.supports(ExecutionStrategy::IsolatedWorkers));
        assert!(!single.supports(ExecutionStrategy::FreeThreadedParallel));
    }

    #[test]
    fn test_recommendations_mention_available_strategies() {
        let full = CapabilityReport::full(8);
        assert!(full
            .recommendation(WorkloadKind::CpuBound)
            .contains("free-threaded"));

        let single = CapabilityReport::new(1, vec![ExecutionStrategy::Sequential]);
        assert!(single
            .recommendation(WorkloadKind::CpuBound)
            .contains("sequential"));
    }
}
