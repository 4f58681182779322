//! Aggregation of span events into a call tree and metrics.
//!
//! This module transforms parsed trace events into:
//! - An aggregated call tree (durations summed per span position)
//! - Per-run averages across repeated runs
//! - Memory sample extremes
//! - Collapsed stacks (for flamegraph generation)

pub mod call_tree;
pub mod metrics;
pub mod reducer;
pub mod stack_builder;

// Re-export main types and functions
pub use call_tree::{CallTree, NodeId, SpanNode};
pub use metrics::{format_bytes, MetricSampler};
pub use reducer::{Reduction, SpanStackReducer};
pub use stack_builder::{collapse_tree, CollapsedStack};
