//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Benchmark harness comparing concurrency strategies for CPU-bound and
/// I/O-bound workloads
#[derive(Parser, Debug, Clone)]
#[command(name = "lockbench")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    // ===== Experiment Selection =====
    /// Workload kind(s) to benchmark
    #[arg(
        short = 'w',
        long = "workloads",
        default_value = "cpu,io",
        value_delimiter = ','
    )]
    pub workloads: Vec<String>,

    /// Execution strategies to compare, in report order
    #[arg(
        short = 's',
        long = "strategies",
        default_value = "sequential,lock-shared,isolated,async,free-threaded",
        value_delimiter = ','
    )]
    pub strategies: Vec<String>,

    /// Number of workers per run
    #[arg(short = 'n', long = "workers", default_value_t = 4)]
    pub workers: u32,

    // ===== Work Sizing =====
    /// Iterations per worker for the CPU-bound workload
    #[arg(long = "cpu-work", default_value_t = 10_000_000)]
    pub cpu_work: u64,

    /// Simulated wait per worker for the I/O-bound workload, in milliseconds
    #[arg(long = "io-wait-ms", default_value_t = 100)]
    pub io_wait_ms: u64,

    /// Abort a run after this many seconds
    #[arg(long = "timeout")]
    pub timeout_secs: Option<u64>,

    // ===== Capability Options =====
    /// Print the runtime capability report and exit
    #[arg(long = "capabilities")]
    pub capabilities: bool,

    /// Treat every strategy as supported (skip hardware gating)
    #[arg(long = "assume-all")]
    pub assume_all: bool,

    // ===== Output Options =====
    /// Write comparison results to a JSON file
    #[arg(short = 'o', long = "json")]
    pub json_output: Option<PathBuf>,

    /// Write comparison results to a CSV file
    #[arg(long = "csv")]
    pub csv_output: Option<PathBuf>,

    /// Quiet mode (minimal output)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Disable the progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

impl CliArgs {
    /// Parse arguments from the process command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["lockbench"]);
        assert_eq!(args.workloads, vec!["cpu", "io"]);
        assert_eq!(args.strategies.len(), 5);
        assert_eq!(args.workers, 4);
        assert_eq!(args.cpu_work, 10_000_000);
        assert_eq!(args.io_wait_ms, 100);
        assert!(!args.quiet);
    }

    #[test]
    fn test_value_delimiters() {
        let args = CliArgs::parse_from(["lockbench", "-w", "io", "-s", "sequential,async"]);
        assert_eq!(args.workloads, vec!["io"]);
        assert_eq!(args.strategies, vec!["sequential", "async"]);
    }
}
