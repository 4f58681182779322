//! Report command implementation.
//!
//! The report command:
//! 1. Reads one trace file per run
//! 2. Reduces every run into a shared call tree
//! 3. Averages over the repeat count
//! 4. Compresses the tree into a report
//! 5. Writes output files

use crate::aggregator::{collapse_tree, SpanStackReducer};
use crate::commands::models::ReportArgs;
use crate::flamegraph::generate_flamegraph;
use crate::output::{render_text_report, to_report, write_report, write_svg, write_text_report};
use crate::parser::read_trace_file;
use crate::parser::schema::BenchReport;
use crate::utils::config::MAX_REPEAT;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The report that was written, Err with context if any step fails
///
/// # Errors
/// * Unreadable trace files
/// * Malformed event streams (stack mismatch, unclosed spans, bad durations)
/// * File write errors
pub fn execute_report(args: ReportArgs) -> Result<BenchReport> {
    let start_time = Instant::now();
    let repeat = args.repeat_count();

    info!(
        "Building report for {} from {} trace file(s), averaging over {} run(s)",
        args.bench_name,
        args.traces.len(),
        repeat
    );

    // Steps 1-2: read and reduce every run against one reducer
    let mut reducer = SpanStackReducer::new();
    for (index, trace_path) in args.traces.iter().enumerate() {
        info!(
            "Step 1/5: Reading trace {}/{}: {}",
            index + 1,
            args.traces.len(),
            trace_path.display()
        );
        let events = read_trace_file(trace_path)
            .with_context(|| format!("Failed to read trace {}", trace_path.display()))?;

        info!("Step 2/5: Reducing {} events...", events.len());
        reducer
            .process(&events)
            .with_context(|| format!("Malformed event stream in {}", trace_path.display()))?;
    }

    // Step 3: average
    info!("Step 3/5: Averaging over {} run(s)...", repeat);
    let reduction = reducer
        .finalize(repeat)
        .context("Failed to finalize call tree")?;

    debug!(
        "Call tree: {} nodes, {} top-level spans",
        reduction.tree.len(),
        reduction.tree.roots().len()
    );

    // Step 4: compress
    info!("Step 4/5: Compressing call tree...");
    let report = to_report(&args.bench_name, &args.comment, repeat, &reduction);

    // Step 5: outputs
    info!("Step 5/5: Writing output files...");
    write_report(&report, &args.output_json).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output_json.display());

    if let Some(text_path) = &args.output_text {
        write_text_report(&report, text_path).context("Failed to write text report")?;
        info!("✓ Text report written to: {}", text_path.display());
    }

    if let Some(svg_path) = &args.output_svg {
        let stacks = collapse_tree(&reduction.tree);
        if stacks.is_empty() {
            warn!(
                "No span recorded any busy time, skipping flamegraph {}",
                svg_path.display()
            );
        } else {
            let svg = generate_flamegraph(&stacks, args.flamegraph_config.as_ref())
                .context("Failed to generate flamegraph")?;
            write_svg(&svg, svg_path).context("Failed to write flamegraph SVG")?;
            info!("✓ Flamegraph written to: {}", svg_path.display());
        }
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("BENCH REPORT");
        println!("{}", "=".repeat(80));
        print!("{}", render_text_report(&report));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Report completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if args.bench_name.trim().is_empty() {
        anyhow::bail!("Benchmark name cannot be empty");
    }

    if args.traces.is_empty() {
        anyhow::bail!("At least one trace file is required");
    }

    for trace in &args.traces {
        if !trace.is_file() {
            anyhow::bail!("Trace file not found: {}", trace.display());
        }
    }

    if args.repeat == Some(0) {
        anyhow::bail!("repeat must be greater than 0");
    }

    if args.repeat_count() > MAX_REPEAT {
        anyhow::bail!("repeat is too large (max {})", MAX_REPEAT);
    }

    Ok(())
}
