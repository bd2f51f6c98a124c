//! lockbench - benchmark harness for comparing concurrency strategies
//!
//! Runs CPU-bound and I/O-bound workloads under selectable execution
//! strategies (sequential, shared-token threads, isolated workers,
//! cooperative async, free-threaded) and reports wall-clock timings so the
//! strategies can be compared.

use anyhow::Result;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use lockbench::capability::{detect_capabilities, CapabilityReport};
use lockbench::config::{CliArgs, HarnessConfig};
use lockbench::harness::Orchestrator;
use lockbench::report;

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_banner(config: &HarnessConfig, capabilities: &CapabilityReport) {
    if config.quiet {
        return;
    }

    println!("lockbench v{}", env!("CARGO_PKG_VERSION"));
    println!("====================================");
    println!(
        "Workloads: {:?}",
        config
            .workloads
            .iter()
            .map(|w| w.as_str())
            .collect::<Vec<_>>()
    );
    println!(
        "Strategies: {:?}",
        config
            .strategies
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
    );
    println!(
        "Workers: {}, cpu-work: {}, io-wait: {}ms",
        config.workers,
        report::format_count(config.cpu_work),
        config.io_wait_ms
    );
    println!("Hardware threads: {}", capabilities.hardware_threads);
    if let Some(timeout) = config.timeout {
        println!("Run ceiling: {}s", timeout.as_secs());
    }
    println!("====================================\n");
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Setup logging
    setup_logging(args.verbose, args.quiet);

    // Build configuration
    let config = HarnessConfig::from_cli(&args)?;

    // Detect runtime capabilities once; the orchestrator treats the report
    // as read-only configuration
    let detected = detect_capabilities();
    let capabilities = if config.assume_all {
        CapabilityReport::full(detected.hardware_threads)
    } else {
        detected
    };

    if args.capabilities {
        capabilities.print();
        return Ok(());
    }

    print_banner(&config, &capabilities);

    let orchestrator = Orchestrator::new(capabilities)
        .with_timeout(config.timeout)
        .with_progress(config.show_progress);

    // Run one comparison per workload, preserving the requested strategy order
    let mut comparisons = Vec::with_capacity(config.workloads.len());
    for &workload in &config.workloads {
        if !config.quiet {
            println!("\nRunning workload: {}", workload);
        }
        let comparison = orchestrator.compare(
            workload,
            &config.strategies,
            config.workers,
            config.work_size(workload),
        )?;
        if !config.quiet {
            report::print_comparison(&comparison);
        }
        comparisons.push(comparison);
    }

    // Export if requested
    if let Some(ref path) = config.json_output {
        info!("Writing results to: {:?}", path);
        report::write_json(&comparisons, path)?;
    }
    if let Some(ref path) = config.csv_output {
        info!("Writing CSV to: {:?}", path);
        report::write_csv(&comparisons, path)?;
    }

    // Print summary
    if !config.quiet {
        let completed: usize = comparisons.iter().map(|c| c.completed().count()).sum();
        let skipped: usize = comparisons.iter().map(|c| c.skipped_count()).sum();

        println!("\n====================================");
        println!("BENCHMARK COMPLETE");
        println!("====================================");
        println!("Comparisons run: {}", comparisons.len());
        println!("Strategies completed: {}", completed);
        println!("Strategies skipped: {}", skipped);
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
