//! Human readable text report.
//!
//! ```text
//! fold (1.50ms; 1.000 MiB, 2.000 MiB): baseline
//!   bench::run: 1.50ms [air::exec]
//!     call: 500.00µs
//!     seq: 900.00µs
//! ```
//!
//! Two spaces of indentation per level, keys in sorted order. A bracketed
//! suffix names the prefix stripped from the keys of the lines below it.

use super::{ensure_parent_dir, validate_path};
use crate::parser::schema::{BenchReport, StatsEntry};
use crate::utils::error::OutputError;
use log::info;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

const INDENT_STEP: usize = 2;

/// Render a report as indented text
///
/// **Public** - used for `--text` and `--summary`
pub fn render_text_report(report: &BenchReport) -> String {
    let mut out = String::new();

    let mut bracketed = report.total_time.clone();
    if let Some([min, max]) = &report.memory_sizes {
        let _ = write!(bracketed, "; {}, {}", min, max);
    }

    let _ = write!(out, "{} ({})", report.bench_name, bracketed);
    if !report.comment.is_empty() {
        let _ = write!(out, ": {}", report.comment);
    }
    push_prefix(&mut out, &report.common_prefix);
    out.push('\n');

    render_entries(&mut out, &report.stats, INDENT_STEP);

    out
}

fn render_entries(out: &mut String, entries: &BTreeMap<String, StatsEntry>, indent: usize) {
    for (name, entry) in entries {
        let _ = write!(out, "{:indent$}{}: {}", "", name, entry.duration(), indent = indent);

        match entry {
            StatsEntry::Leaf(_) => out.push('\n'),
            StatsEntry::Nested(nested) => {
                push_prefix(out, &nested.common_prefix);
                out.push('\n');
                render_entries(out, &nested.nested, indent + INDENT_STEP);
            }
        }
    }
}

fn push_prefix(out: &mut String, prefix: &str) {
    if !prefix.is_empty() {
        let _ = write!(out, " [{}]", prefix);
    }
}

/// Write the text rendering of a report to a file
///
/// **Public** - main entry point for text output
pub fn write_text_report(report: &BenchReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing text report to: {}", output_path.display());

    validate_path(output_path)?;
    ensure_parent_dir(output_path)?;

    std::fs::write(output_path, render_text_report(report)).map_err(OutputError::WriteFailed)
}
