//! Harness configuration derived from CLI arguments

use std::path::PathBuf;
use std::time::Duration;

use super::cli::CliArgs;
use crate::harness::ExecutionStrategy;
use crate::utils::{HarnessError, Result};
use crate::workload::WorkloadKind;

/// Complete harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    // Experiment
    pub workloads: Vec<WorkloadKind>,
    pub strategies: Vec<ExecutionStrategy>,
    pub workers: u32,

    // Work sizing
    pub cpu_work: u64,
    pub io_wait_ms: u64,
    pub timeout: Option<Duration>,

    // Capability
    pub assume_all: bool,

    // Output
    pub json_output: Option<PathBuf>,
    pub csv_output: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
    pub show_progress: bool,
}

impl HarnessConfig {
    /// Validate CLI arguments and build the resolved configuration
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        if args.workers == 0 {
            return Err(HarnessError::InvalidParameter(
                "--workers must be positive".to_string(),
            ));
        }
        if args.cpu_work == 0 {
            return Err(HarnessError::InvalidParameter(
                "--cpu-work must be positive".to_string(),
            ));
        }
        if args.io_wait_ms == 0 {
            return Err(HarnessError::InvalidParameter(
                "--io-wait-ms must be positive".to_string(),
            ));
        }
        if args.timeout_secs == Some(0) {
            return Err(HarnessError::InvalidParameter(
                "--timeout must be positive".to_string(),
            ));
        }

        let workloads = args
            .workloads
            .iter()
            .map(|s| {
                WorkloadKind::parse(s).ok_or_else(|| {
                    HarnessError::InvalidParameter(format!(
                        "unknown workload '{}' (expected cpu or io)",
                        s
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if workloads.is_empty() {
            return Err(HarnessError::InvalidParameter(
                "at least one workload is required".to_string(),
            ));
        }

        let strategies = args
            .strategies
            .iter()
            .map(|s| {
                ExecutionStrategy::parse(s).ok_or_else(|| {
                    HarnessError::InvalidParameter(format!(
                        "unknown strategy '{}' (expected sequential, lock-shared, isolated, \
                         async, or free-threaded)",
                        s
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if strategies.is_empty() {
            return Err(HarnessError::InvalidParameter(
                "at least one strategy is required".to_string(),
            ));
        }

        Ok(Self {
            workloads,
            strategies,
            workers: args.workers,
            cpu_work: args.cpu_work,
            io_wait_ms: args.io_wait_ms,
            timeout: args.timeout_secs.map(Duration::from_secs),
            assume_all: args.assume_all,
            json_output: args.json_output.clone(),
            csv_output: args.csv_output.clone(),
            quiet: args.quiet,
            verbose: args.verbose,
            show_progress: !args.quiet && !args.no_progress,
        })
    }

    /// Work per worker for the given workload kind
    pub fn work_size(&self, workload: WorkloadKind) -> u64 {
        match workload {
            WorkloadKind::CpuBound => self.cpu_work,
            WorkloadKind::IoBound => self.io_wait_ms,
        }
    }
}
