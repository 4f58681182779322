use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)
        .with_context(|| format!("Invalid report {}", file_path.display()))?;

    let span_count: usize = report.stats.values().map(|entry| entry.count()).sum();

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Bench: {}", report.bench_name);
    println!("  Repeat: {}", report.repeat);
    println!("  Total Time: {}", report.total_time);
    if let Some([min, max]) = &report.memory_sizes {
        println!("  Memory: {} .. {}", min, max);
    }
    println!("  Spans: {}", span_count);

    if report.version != SCHEMA_VERSION {
        println!(
            "  ⚠ Schema version differs from current ({})",
            SCHEMA_VERSION
        );
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Trace Metering Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  bench_name: string       - Benchmark name");
        println!("  comment: string          - Free-form note");
        println!("  repeat: number           - Runs averaged over");
        println!("  total_time: string       - Average time of top-level spans");
        println!("  memory_sizes: [string]?  - Min and max memory sample");
        println!("  common_prefix: string    - Prefix stripped from top-level keys");
        println!("  stats: object            - Span name -> entry");
        println!("    entry: string          - Duration of a span without children");
        println!("    entry: object          - Span with children:");
        println!("      common_prefix: string  - Prefix stripped from nested keys");
        println!("      duration: string       - Duration of the span");
        println!("      nested: object         - Child span name -> entry");
        println!("  generated_at: string     - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Trace Metering v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Call-tree timing reports from tracing span event logs.");
}
