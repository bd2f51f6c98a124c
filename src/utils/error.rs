//! Error types for lockbench

use std::time::Duration;

use thiserror::Error;

use crate::harness::ExecutionStrategy;
use crate::workload::WorkloadKind;

/// Top-level harness error
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Strategy {strategy} is not supported by this runtime")]
    UnsupportedStrategy { strategy: ExecutionStrategy },

    #[error("Strategy {strategy} cannot drive {workload} workloads")]
    WorkloadStrategyMismatch {
        strategy: ExecutionStrategy,
        workload: WorkloadKind,
    },

    #[error("Run exceeded the {0:?} wall-clock ceiling")]
    Timeout(Duration),

    #[error("Worker error: {0}")]
    Worker(String),
}

impl HarnessError {
    /// Errors that invalidate a single strategy's run without poisoning an
    /// enclosing comparison. Everything else aborts the comparison.
    pub fn is_strategy_local(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedStrategy { .. }
                | Self::WorkloadStrategyMismatch { .. }
                | Self::Timeout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_local_errors() {
        let unsupported = HarnessError::UnsupportedStrategy {
            strategy: ExecutionStrategy::IsolatedWorkers,
        };
        let mismatch = HarnessError::WorkloadStrategyMismatch {
            strategy: ExecutionStrategy::CooperativeAsync,
            workload: WorkloadKind::CpuBound,
        };
        assert!(unsupported.is_strategy_local());
        assert!(mismatch.is_strategy_local());
        assert!(HarnessError::Timeout(Duration::from_secs(1)).is_strategy_local());
        assert!(!HarnessError::InvalidParameter("workers".to_string()).is_strategy_local());
        assert!(!HarnessError::Worker("panicked".to_string()).is_strategy_local());
    }

    #[test]
    fn test_error_display() {
        let err = HarnessError::UnsupportedStrategy {
            strategy: ExecutionStrategy::FreeThreadedParallel,
        };
        assert_eq!(
            err.to_string(),
            "Strategy FREE-THREADED is not supported by this runtime"
        );
    }
}
