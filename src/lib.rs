//! Trace Metering
//!
//! Reduces span enter/close events logged by an instrumented process
//! (`tracing-subscriber` JSON output) into an averaged call tree, and
//! writes compact JSON, text and flamegraph reports from it.
//!
//! ## Library use
//!
//! ```ignore
//! let mut reducer = SpanStackReducer::new();
//! for trace in &traces {
//!     reducer.process(&read_trace_file(trace)?)?;
//! }
//! let reduction = reducer.finalize(traces.len() as u32)?;
//! let stats = compress(&reduction.tree);
//! ```

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod parser;
pub mod utils;

pub use aggregator::{CallTree, Reduction, SpanStackReducer};
pub use output::compress;
pub use parser::TraceEvent;
