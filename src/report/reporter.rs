//! Comparison reporting - output formatting and export
//!
//! Supports multiple output formats:
//! - Console (human-readable)
//! - JSON
//! - CSV

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::json;

use crate::harness::{Comparison, RunResult, StrategyOutcome};

/// Per-worker latency summary in milliseconds
#[derive(Serialize)]
struct LatencySummary {
    p50_ms: f64,
    p99_ms: f64,
    max_ms: f64,
}

impl LatencySummary {
    fn from_result(result: &RunResult) -> Self {
        Self {
            p50_ms: result.percentile_ms(50.0),
            p99_ms: result.percentile_ms(99.0),
            max_ms: result.worker_latency.max() as f64 / 1000.0,
        }
    }
}

/// One strategy row in the exported comparison
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum StrategyRow<'a> {
    Completed {
        strategy: &'a str,
        elapsed_secs: f64,
        speedup: Option<f64>,
        completed_workers: u32,
        worker_count: u32,
        worker_latency_ms: LatencySummary,
    },
    Skipped {
        strategy: &'a str,
        reason: &'a str,
    },
}

/// Speedup of a result relative to the comparison baseline
fn speedup(baseline: &RunResult, result: &RunResult) -> f64 {
    baseline.elapsed.as_secs_f64() / result.elapsed.as_secs_f64()
}

/// Print a comparison table to stdout
pub fn print_comparison(cmp: &Comparison) {
    println!(
        "\n=== {} | {} workers | work size {} {} ===",
        cmp.workload,
        cmp.worker_count,
        format_count(cmp.work_size),
        cmp.workload.work_unit()
    );

    let baseline = cmp.baseline();
    for outcome in &cmp.outcomes {
        match outcome {
            StrategyOutcome::Completed(result) => {
                let speedup_str = match baseline {
                    Some(base) => format!("{:.2}x", speedup(base, result)),
                    None => "-".to_string(),
                };
                println!(
                    "  {:<14} {:>9.3}s  {:>7}  {}/{} workers  per-worker p50={:.1}ms max={:.1}ms",
                    result.strategy.as_str(),
                    result.elapsed.as_secs_f64(),
                    speedup_str,
                    result.completed_workers,
                    result.worker_count,
                    result.percentile_ms(50.0),
                    result.worker_latency.max() as f64 / 1000.0
                );
            }
            StrategyOutcome::Skipped { strategy, reason } => {
                println!("  {:<14} skipped ({})", strategy.as_str(), reason);
            }
        }
    }
}

fn comparison_rows(cmp: &Comparison) -> Vec<StrategyRow<'_>> {
    let baseline = cmp.baseline();
    cmp.outcomes
        .iter()
        .map(|outcome| match outcome {
            StrategyOutcome::Completed(result) => StrategyRow::Completed {
                strategy: result.strategy.as_str(),
                elapsed_secs: result.elapsed.as_secs_f64(),
                speedup: baseline.map(|base| speedup(base, result)),
                completed_workers: result.completed_workers,
                worker_count: result.worker_count,
                worker_latency_ms: LatencySummary::from_result(result),
            },
            StrategyOutcome::Skipped { strategy, reason } => StrategyRow::Skipped {
                strategy: strategy.as_str(),
                reason,
            },
        })
        .collect()
}

fn comparison_json(cmp: &Comparison) -> serde_json::Value {
    json!({
        "workload": cmp.workload.as_str(),
        "worker_count": cmp.worker_count,
        "work_size": cmp.work_size,
        "work_unit": cmp.workload.work_unit(),
        "results": comparison_rows(cmp),
    })
}

/// Write comparisons to a JSON file
pub fn write_json(comparisons: &[Comparison], path: &Path) -> io::Result<()> {
    let doc = json!({
        "comparisons": comparisons.iter().map(comparison_json).collect::<Vec<_>>(),
    });

    let mut file = File::create(path)?;
    writeln!(file, "{}", serde_json::to_string_pretty(&doc).unwrap())?;
    Ok(())
}

/// Write comparisons to a CSV file
pub fn write_csv(comparisons: &[Comparison], path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;

    writeln!(
        file,
        "workload,strategy,status,worker_count,work_size,elapsed_secs,speedup,completed_workers,p50_ms,p99_ms,max_ms"
    )?;

    for cmp in comparisons {
        let baseline = cmp.baseline();
        for outcome in &cmp.outcomes {
            match outcome {
                StrategyOutcome::Completed(result) => {
                    let speedup_str = baseline
                        .map(|base| format!("{:.3}", speedup(base, result)))
                        .unwrap_or_default();
                    writeln!(
                        file,
                        "{},{},completed,{},{},{:.6},{},{},{:.3},{:.3},{:.3}",
                        cmp.workload.as_str(),
                        result.strategy.as_str(),
                        cmp.worker_count,
                        cmp.work_size,
                        result.elapsed.as_secs_f64(),
                        speedup_str,
                        result.completed_workers,
                        result.percentile_ms(50.0),
                        result.percentile_ms(99.0),
                        result.worker_latency.max() as f64 / 1000.0
                    )?;
                }
                StrategyOutcome::Skipped { strategy, .. } => {
                    writeln!(
                        file,
                        "{},{},skipped,{},{},,,,,,",
                        cmp.workload.as_str(),
                        strategy.as_str(),
                        cmp.worker_count,
                        cmp.work_size
                    )?;
                }
            }
        }
    }

    Ok(())
}

/// Format large numbers with thousands separators
/// Examples: 1,234,567 or 987,654
pub fn format_count(value: u64) -> String {
    let s = value.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}
