//! Span lifecycle events read from `tracing-subscriber` JSON logs.
//!
//! One JSON object per line. Only span `enter`/`close` records and records
//! carrying a memory sample matter to the reducer; everything else is skipped.

use crate::utils::config::{BUSY_TIME_FIELD, MEMORY_FIELD_NAMES, NAMESPACE_SEPARATOR};
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Span lifecycle message kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanMessage {
    Enter,
    Close,
    Other,
}

impl SpanMessage {
    fn from_field(message: Option<&str>) -> Self {
        match message {
            Some("enter") => SpanMessage::Enter,
            Some("close") => SpanMessage::Close,
            _ => SpanMessage::Other,
        }
    }
}

/// A single event of the trace stream, as seen by the reducer
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEvent {
    pub message: SpanMessage,

    /// Name of the span this event concerns
    pub span: String,

    /// Module path of the span's callsite
    pub target: Option<String>,

    /// Enclosing span names, outermost first, excluding `span` itself
    pub ancestor_spans: Vec<String>,

    /// Busy time reported on close, e.g. `"1.52ms"`
    pub raw_duration: Option<String>,

    /// Named scalar samples (memory sizes) carried by the record
    pub metric_samples: BTreeMap<String, u64>,
}

impl TraceEvent {
    pub fn enter(span: impl Into<String>, target: Option<&str>, ancestors: &[&str]) -> Self {
        Self::span_event(SpanMessage::Enter, span, target, ancestors, None)
    }

    pub fn close(
        span: impl Into<String>,
        target: Option<&str>,
        ancestors: &[&str],
        busy: Option<&str>,
    ) -> Self {
        Self::span_event(SpanMessage::Close, span, target, ancestors, busy)
    }

    pub fn metric(name: impl Into<String>, value: u64) -> Self {
        let mut metric_samples = BTreeMap::new();
        metric_samples.insert(name.into(), value);

        Self {
            message: SpanMessage::Other,
            span: String::new(),
            target: None,
            ancestor_spans: Vec::new(),
            raw_duration: None,
            metric_samples,
        }
    }

    fn span_event(
        message: SpanMessage,
        span: impl Into<String>,
        target: Option<&str>,
        ancestors: &[&str],
        busy: Option<&str>,
    ) -> Self {
        Self {
            message,
            span: span.into(),
            target: target.map(str::to_string),
            ancestor_spans: ancestors.iter().map(|s| s.to_string()).collect(),
            raw_duration: busy.map(str::to_string),
            metric_samples: BTreeMap::new(),
        }
    }

    /// `target::span`, or the bare span name when there is no target
    pub fn qualified_name(&self) -> String {
        match &self.target {
            Some(target) if !target.is_empty() => {
                format!("{}{}{}", target, NAMESPACE_SEPARATOR, self.span)
            }
            _ => self.span.clone(),
        }
    }
}

/// Raw JSON record shape; unknown keys are ignored
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    fields: serde_json::Map<String, serde_json::Value>,

    #[serde(default)]
    span: Option<RawSpan>,

    #[serde(default)]
    target: Option<String>,

    #[serde(default)]
    spans: Vec<RawSpan>,
}

#[derive(Debug, Deserialize)]
struct RawSpan {
    #[serde(default)]
    name: Option<String>,
}

/// Parse one JSON log line into an event
///
/// **Public** - used by `read_events` and tests
///
/// # Returns
/// * `Ok(Some(event))` for enter/close records and metric samples
/// * `Ok(None)` for records the reducer has no interest in
///
/// Enter/close records that fail to decode are skipped with a warning.
///
/// # Errors
/// * `ParseError::JsonError` - the line is not JSON at all
pub fn parse_record(line: &str) -> Result<Option<TraceEvent>, ParseError> {
    let value: serde_json::Value = serde_json::from_str(line)?;
    let declared_message = SpanMessage::from_field(
        value
            .get("fields")
            .and_then(|fields| fields.get("message"))
            .and_then(|message| message.as_str()),
    );

    // Valid JSON of another shape is just not ours
    let record: RawRecord = match serde_json::from_value(value) {
        Ok(record) => record,
        Err(e) if declared_message != SpanMessage::Other => {
            warn!("Skipping malformed {:?} record: {}", declared_message, e);
            return Ok(None);
        }
        Err(e) => {
            debug!("Skipping record of unknown shape: {}", e);
            return Ok(None);
        }
    };

    let message = SpanMessage::from_field(record.fields.get("message").and_then(|m| m.as_str()));
    let metric_samples = extract_metric_samples(&record.fields);

    let span_name = record.span.as_ref().and_then(|s| s.name.clone());

    match (message, span_name) {
        (SpanMessage::Enter | SpanMessage::Close, Some(span)) => {
            let mut ancestor_spans: Vec<String> = record
                .spans
                .into_iter()
                .filter_map(|s| s.name)
                .collect();

            // tracing-subscriber lists the entered span itself last on enter records
            if message == SpanMessage::Enter && ancestor_spans.last() == Some(&span) {
                ancestor_spans.pop();
            }

            let raw_duration = if message == SpanMessage::Close {
                record
                    .fields
                    .get(BUSY_TIME_FIELD)
                    .and_then(|busy| busy.as_str())
                    .map(str::to_string)
            } else {
                None
            };

            Ok(Some(TraceEvent {
                message,
                span,
                target: record.target,
                ancestor_spans,
                raw_duration,
                metric_samples,
            }))
        }
        (SpanMessage::Enter | SpanMessage::Close, None) => {
            warn!("Skipping {:?} record without span name", message);
            Ok(None)
        }
        (SpanMessage::Other, _) if !metric_samples.is_empty() => Ok(Some(TraceEvent {
            message: SpanMessage::Other,
            span: String::new(),
            target: record.target,
            ancestor_spans: Vec::new(),
            raw_duration: None,
            metric_samples,
        })),
        (SpanMessage::Other, _) => Ok(None),
    }
}

/// Pull the configured memory fields out of a record's fields
///
/// **Private** - internal helper for parse_record
fn extract_metric_samples(
    fields: &serde_json::Map<String, serde_json::Value>,
) -> BTreeMap<String, u64> {
    MEMORY_FIELD_NAMES
        .iter()
        .filter_map(|name| {
            fields
                .get(*name)
                .and_then(|value| value.as_u64())
                .map(|value| (name.to_string(), value))
        })
        .collect()
}

/// Read every interesting event from a JSON-lines trace
///
/// **Public** - main entry point for trace reading
///
/// Blank lines are ignored. Lines that are not JSON (stray process output
/// interleaved with the log) are skipped with a warning.
///
/// # Errors
/// * `ParseError::IoError` - the reader failed
pub fn read_events<R: BufRead>(input: R) -> Result<Vec<TraceEvent>, ParseError> {
    let mut events = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_record(line) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => skipped += 1,
            Err(e) => {
                warn!("Failed to parse trace line {}: {}", index + 1, e);
                skipped += 1;
            }
        }
    }

    debug!("Read {} events, skipped {} records", events.len(), skipped);

    Ok(events)
}

/// Read a JSON-lines trace file
///
/// **Public** - used by the report command
pub fn read_trace_file(path: impl AsRef<Path>) -> Result<Vec<TraceEvent>, ParseError> {
    let path = path.as_ref();
    debug!("Reading trace from: {}", path.display());

    let file = File::open(path)?;
    read_events(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enter_drops_own_span() {
        let line = r#"{"timestamp":"2023-03-01T10:00:00Z","level":"INFO","fields":{"message":"enter"},"target":"air::execution","span":{"name":"execute"},"spans":[{"name":"runner"},{"name":"execute"}]}"#;

        let event = parse_record(line).unwrap().unwrap();
        assert_eq!(event.message, SpanMessage::Enter);
        assert_eq!(event.span, "execute");
        assert_eq!(event.ancestor_spans, vec!["runner".to_string()]);
        assert_eq!(event.qualified_name(), "air::execution::execute");
        assert!(event.raw_duration.is_none());
    }

    #[test]
    fn test_parse_close_with_busy_time() {
        let line = r#"{"fields":{"message":"close","time.busy":"1.52ms","time.idle":"3.1µs"},"target":"air","span":{"name":"execute","call_id":7},"spans":[{"name":"runner"}]}"#;

        let event = parse_record(line).unwrap().unwrap();
        assert_eq!(event.message, SpanMessage::Close);
        assert_eq!(event.raw_duration.as_deref(), Some("1.52ms"));
        assert_eq!(event.ancestor_spans, vec!["runner".to_string()]);
    }

    #[test]
    fn test_parse_memory_sample() {
        let line = r#"{"level":"WARN","fields":{"memory_size":1048576},"target":"air::runner"}"#;

        let event = parse_record(line).unwrap().unwrap();
        assert_eq!(event.message, SpanMessage::Other);
        assert_eq!(event.metric_samples.get("memory_size"), Some(&1048576));
    }

    #[test]
    fn test_parse_uninteresting_records() {
        let new_span = r#"{"fields":{"message":"new"},"target":"air","span":{"name":"execute"}}"#;
        assert!(parse_record(new_span).unwrap().is_none());

        let plain_log = r#"{"fields":{"message":"hello"},"target":"air"}"#;
        assert!(parse_record(plain_log).unwrap().is_none());

        let other_shape = r#"[1, 2, 3]"#;
        assert!(parse_record(other_shape).unwrap().is_none());

        let no_span = r#"{"fields":{"message":"enter"},"target":"air"}"#;
        assert!(parse_record(no_span).unwrap().is_none());
    }

    #[test]
    fn test_parse_malformed_span_record_is_skipped() {
        let numeric_target = r#"{"fields":{"message":"enter"},"target":42,"span":{"name":"execute"},"spans":[]}"#;
        assert!(parse_record(numeric_target).unwrap().is_none());

        let bad_spans = r#"{"fields":{"message":"close","time.busy":"1ms"},"span":{"name":"execute"},"spans":"execute"}"#;
        assert!(parse_record(bad_spans).unwrap().is_none());
    }

    #[test]
    fn test_parse_not_json() {
        assert!(parse_record("Compiling air v0.1.0").is_err());
    }

    #[test]
    fn test_read_events_skips_noise() {
        let input = r#"
{"fields":{"message":"enter"},"span":{"name":"main"},"spans":[{"name":"main"}]}
warning: something unrelated
{"fields":{"message":"new"},"span":{"name":"main"}}

{"fields":{"message":"close","time.busy":"5ms"},"span":{"name":"main"},"spans":[]}
"#;

        let events = read_events(input.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, SpanMessage::Enter);
        assert!(events[0].ancestor_spans.is_empty());
        assert_eq!(events[1].message, SpanMessage::Close);
    }

    #[test]
    fn test_qualified_name_without_target() {
        let event = TraceEvent::enter("X", None, &[]);
        assert_eq!(event.qualified_name(), "X");

        let event = TraceEvent::enter("X", Some(""), &[]);
        assert_eq!(event.qualified_name(), "X");
    }
}
