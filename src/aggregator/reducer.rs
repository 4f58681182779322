//! Reduce a stream of span enter/close events into a call tree.
//!
//! The reducer keeps an explicit stack of open spans (as node indices into
//! the tree) and validates every event's declared ancestor chain against it.
//! Input must come from a single-threaded, well-nested source: one open call
//! chain at a time. Anything else is reported as a fatal error.
//!
//! Repeated runs of the same benchmark are fed to the same reducer one after
//! the other, so durations sum across runs and are averaged at the end.

use super::call_tree::{CallTree, NodeId};
use super::metrics::MetricSampler;
use crate::parser::duration::parse_duration;
use crate::parser::events::{SpanMessage, TraceEvent};
use crate::utils::error::ReduceError;
use log::{debug, trace};
use std::time::Duration;

/// Final, averaged view of everything a reducer has seen
#[derive(Debug, Clone)]
pub struct Reduction {
    /// Call tree with per-run average durations
    pub tree: CallTree,

    /// Average total time of the top-level spans
    pub total_time: Duration,

    /// Formatted (min, max) memory samples
    pub memory_sizes: Option<(String, String)>,
}

/// Stack-based call tree builder
///
/// **Public** - one instance per benchmark
#[derive(Debug, Default)]
pub struct SpanStackReducer {
    tree: CallTree,
    stack: Vec<NodeId>,
    memory: MetricSampler,
    runs: usize,
}

impl SpanStackReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one complete event stream (one run of the benchmark)
    ///
    /// **Public** - call once per repeat
    ///
    /// # Errors
    /// * `ReduceError::StackMismatch` - an event's ancestors don't match the open spans
    /// * `ReduceError::Duration` - a busy time could not be decoded
    /// * `ReduceError::UnclosedSpans` - the stream ended with spans still open
    ///
    /// After an error the reducer state is inconsistent and should be dropped.
    pub fn process<'a, I>(&mut self, events: I) -> Result<(), ReduceError>
    where
        I: IntoIterator<Item = &'a TraceEvent>,
    {
        let mut count = 0usize;
        for event in events {
            self.on_event(event)?;
            count += 1;
        }

        if !self.stack.is_empty() {
            return Err(ReduceError::UnclosedSpans(self.open_spans()));
        }

        self.runs += 1;
        debug!(
            "Run {} reduced: {} events, {} tree nodes",
            self.runs,
            count,
            self.tree.len()
        );

        Ok(())
    }

    /// Apply a single event
    pub fn on_event(&mut self, event: &TraceEvent) -> Result<(), ReduceError> {
        self.on_metric_sample(event);

        match event.message {
            SpanMessage::Enter => self.on_enter(event),
            SpanMessage::Close => self.on_close(event),
            SpanMessage::Other => Ok(()),
        }
    }

    fn on_enter(&mut self, event: &TraceEvent) -> Result<(), ReduceError> {
        let parent = self.find_parent(event)?;
        let qualified_name = event.qualified_name();

        let id = self
            .tree
            .get_or_insert_child(parent, &qualified_name, &event.span);

        trace!("Enter {} (depth {})", qualified_name, self.stack.len());
        self.stack.push(id);

        Ok(())
    }

    fn on_close(&mut self, event: &TraceEvent) -> Result<(), ReduceError> {
        let popped = self.stack.pop().ok_or_else(|| self.mismatch(event))?;

        let parent = self.find_parent(event)?;
        let qualified_name = event.qualified_name();

        if self.tree.child(parent, &qualified_name) != Some(popped) {
            return Err(self.mismatch(event));
        }

        // TODO: confirm with the tracer whether a close without time.busy can mean lost data
        if event.raw_duration.is_none() {
            debug!("Close of {} carries no busy time", qualified_name);
        }

        let elapsed = parse_duration(event.raw_duration.as_deref())?;
        trace!("Close {} after {:?}", qualified_name, elapsed);
        self.tree.add_time(popped, elapsed);

        Ok(())
    }

    fn on_metric_sample(&mut self, event: &TraceEvent) {
        for value in event.metric_samples.values() {
            self.memory.record(*value);
        }
    }

    /// Check the declared ancestor chain against the open stack
    ///
    /// **Private** - shared by enter and close
    ///
    /// Walks from the root down by key, bottom of the stack first. Every step
    /// must match the declared span name and land on the node held at that
    /// stack position.
    ///
    /// # Returns
    /// The node the event's span belongs under (`None` = top level)
    fn find_parent(&self, event: &TraceEvent) -> Result<Option<NodeId>, ReduceError> {
        if event.ancestor_spans.len() != self.stack.len() {
            return Err(self.mismatch(event));
        }

        let mut parent = None;
        for (declared, &open) in event.ancestor_spans.iter().zip(&self.stack) {
            let node = self.tree.node(open);
            if node.span != *declared || self.tree.child(parent, &node.qualified_name) != Some(open)
            {
                return Err(self.mismatch(event));
            }
            parent = Some(open);
        }

        Ok(parent)
    }

    fn mismatch(&self, event: &TraceEvent) -> ReduceError {
        ReduceError::StackMismatch {
            span: event.qualified_name(),
            declared: event.ancestor_spans.clone(),
            open: self.open_spans(),
        }
    }

    /// Qualified names of the currently open spans, outermost first
    pub fn open_spans(&self) -> Vec<String> {
        self.stack
            .iter()
            .map(|id| self.tree.node(*id).qualified_name.clone())
            .collect()
    }

    /// Accumulated (not averaged) call tree
    pub fn tree(&self) -> &CallTree {
        &self.tree
    }

    pub fn memory(&self) -> &MetricSampler {
        &self.memory
    }

    /// Number of streams processed successfully
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Call tree with every duration divided by `repeat`
    ///
    /// Accumulated totals are left untouched.
    pub fn averaged(&self, repeat: u32) -> Result<CallTree, ReduceError> {
        check_repeat(repeat)?;
        Ok(self.tree.scaled_down(repeat))
    }

    /// Sum of the top-level spans divided by `repeat`
    pub fn total_time(&self, repeat: u32) -> Result<Duration, ReduceError> {
        check_repeat(repeat)?;
        Ok(self.tree.total() / repeat)
    }

    /// Averaged tree, total time and memory summary in one go
    ///
    /// **Public** - main exit point of the reducer
    pub fn finalize(&self, repeat: u32) -> Result<Reduction, ReduceError> {
        if self.runs != repeat as usize {
            debug!(
                "Averaging over {} repeats, {} streams were processed",
                repeat, self.runs
            );
        }

        Ok(Reduction {
            tree: self.averaged(repeat)?,
            total_time: self.total_time(repeat)?,
            memory_sizes: self.memory.summary(),
        })
    }
}

fn check_repeat(repeat: u32) -> Result<(), ReduceError> {
    if repeat == 0 {
        Err(ReduceError::ZeroRepeats)
    } else {
        Ok(())
    }
}
