//! Trace parsing and schema definitions.
//!
//! This module handles:
//! - Decoding JSON-lines span events from tracing logs
//! - The textual duration codec
//! - Defining output schema

pub mod duration;
pub mod events;
pub mod schema;

// Re-export main types
pub use duration::{format_duration, parse_duration};
pub use events::{parse_record, read_events, read_trace_file, SpanMessage, TraceEvent};
pub use schema::{BenchReport, NestedStats, StatsEntry};
