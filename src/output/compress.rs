//! Common-prefix compression of the call tree for reports.
//!
//! Qualified span names repeat the same module path over and over
//! (`air::execution::call`, `air::execution::seq`, ...). For each set of
//! siblings the longest shared run of `::` segments is factored out and
//! reported once as `common_prefix`. Durations are only formatted, never
//! changed.

use crate::aggregator::{CallTree, NodeId, Reduction};
use crate::parser::duration::format_duration;
use crate::parser::schema::{BenchReport, NestedStats, StatsEntry};
use crate::utils::config::{NAMESPACE_SEPARATOR, SCHEMA_VERSION};
use std::collections::BTreeMap;

/// A compressed set of siblings
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedStats {
    /// Segments removed from every key, joined with `::`
    pub common_prefix: String,

    /// Siblings keyed by their shortened names
    pub entries: BTreeMap<String, StatsEntry>,
}

/// Compress a whole call tree, top-level spans included
///
/// **Public** - main entry point for report compression
pub fn compress(tree: &CallTree) -> CompressedStats {
    compress_siblings(tree, tree.roots())
}

/// Compress one set of siblings and, recursively, their children
///
/// **Private** - internal recursion for compress
fn compress_siblings(tree: &CallTree, siblings: &BTreeMap<String, NodeId>) -> CompressedStats {
    let prefix = common_prefix(siblings.keys().map(String::as_str));

    let entries = siblings
        .iter()
        .map(|(name, id)| (strip_segments(name, prefix.len()), compress_node(tree, *id)))
        .collect();

    CompressedStats {
        common_prefix: prefix.join(NAMESPACE_SEPARATOR),
        entries,
    }
}

fn compress_node(tree: &CallTree, id: NodeId) -> StatsEntry {
    let node = tree.node(id);
    let duration = format_duration(node.cumulative);

    if node.is_leaf() {
        return StatsEntry::Leaf(duration);
    }

    let children = compress_siblings(tree, &node.children);
    StatsEntry::Nested(NestedStats {
        common_prefix: children.common_prefix,
        duration,
        nested: children.entries,
    })
}

/// Longest run of leading `::` segments shared by all names
///
/// **Public** - exposed for tests and the text report
///
/// Fewer than two names share nothing. The prefix stops short of the
/// shortest name's last segment so no key is stripped to nothing.
pub fn common_prefix<'a, I>(names: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut names = names.into_iter();
    let Some(first) = names.next() else {
        return Vec::new();
    };

    let mut prefix: Vec<&str> = first.split(NAMESPACE_SEPARATOR).collect();
    let mut shortest = prefix.len();
    let mut count = 1usize;

    for name in names {
        count += 1;
        let segments: Vec<&str> = name.split(NAMESPACE_SEPARATOR).collect();
        shortest = shortest.min(segments.len());

        let shared = prefix
            .iter()
            .zip(&segments)
            .take_while(|(a, b)| a == b)
            .count();
        prefix.truncate(shared);
    }

    if count < 2 {
        return Vec::new();
    }

    prefix.truncate(shortest.saturating_sub(1));
    prefix
}

/// Drop the first `count` segments of a qualified name
fn strip_segments(name: &str, count: usize) -> String {
    if count == 0 {
        return name.to_string();
    }

    name.splitn(count + 1, NAMESPACE_SEPARATOR)
        .nth(count)
        .unwrap_or(name)
        .to_string()
}

/// Assemble the report for one benchmark
///
/// **Public** - used by commands to create final output
///
/// # Arguments
/// * `bench_name` - Benchmark name
/// * `comment` - Free-form note
/// * `repeat` - Number of runs the reduction was averaged over
/// * `reduction` - Finalized reducer output
pub fn to_report(bench_name: &str, comment: &str, repeat: u32, reduction: &Reduction) -> BenchReport {
    use chrono::Utc;

    let stats = compress(&reduction.tree);

    BenchReport {
        version: SCHEMA_VERSION.to_string(),
        bench_name: bench_name.to_string(),
        comment: comment.to_string(),
        repeat,
        total_time: format_duration(reduction.total_time),
        memory_sizes: reduction
            .memory_sizes
            .clone()
            .map(|(min, max)| [min, max]),
        common_prefix: stats.common_prefix,
        stats: stats.entries,
        generated_at: Utc::now().to_rfc3339(),
    }
}
