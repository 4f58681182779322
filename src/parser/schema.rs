//! Output JSON schema definitions for benchmark reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level report for one benchmark, written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Benchmark name
    pub bench_name: String,

    /// Free-form note attached by whoever ran the benchmark
    #[serde(default)]
    pub comment: String,

    /// Number of runs the durations were averaged over
    pub repeat: u32,

    /// Average wall time of all top-level spans
    pub total_time: String,

    /// Smallest and largest memory sample, if any were recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_sizes: Option<[String; 2]>,

    /// Prefix stripped from the top-level keys of `stats`
    #[serde(default)]
    pub common_prefix: String,

    /// Compressed call tree
    pub stats: BTreeMap<String, StatsEntry>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// One node of the compressed call tree
///
/// A span without children collapses to its formatted duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatsEntry {
    Leaf(String),
    Nested(NestedStats),
}

/// A span with children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedStats {
    /// Prefix stripped from the keys of `nested`
    pub common_prefix: String,

    /// Average busy time of the span itself (children included)
    pub duration: String,

    pub nested: BTreeMap<String, StatsEntry>,
}

impl StatsEntry {
    /// Formatted duration, whatever the entry shape
    pub fn duration(&self) -> &str {
        match self {
            StatsEntry::Leaf(duration) => duration,
            StatsEntry::Nested(nested) => &nested.duration,
        }
    }

    /// Number of entries in this subtree, the entry itself included
    pub fn count(&self) -> usize {
        match self {
            StatsEntry::Leaf(_) => 1,
            StatsEntry::Nested(nested) => {
                1 + nested.nested.values().map(StatsEntry::count).sum::<usize>()
            }
        }
    }
}
