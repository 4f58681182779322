use std::time::Duration;
use trace_metering::aggregator::{collapse_tree, SpanStackReducer};
use trace_metering::parser::{read_events, TraceEvent};
use trace_metering::utils::error::ReduceError;

const RUN_LOG: &str = r#"
{"timestamp":"t0","level":"INFO","fields":{"message":"enter"},"target":"air::runner","span":{"name":"execute"},"spans":[{"name":"execute"}]}
{"timestamp":"t1","level":"INFO","fields":{"message":"enter"},"target":"air::preparation","span":{"name":"prepare"},"spans":[{"name":"execute"},{"name":"prepare"}]}
{"timestamp":"t2","level":"INFO","fields":{"message":"close","time.busy":"200µs","time.idle":"1µs"},"target":"air::preparation","span":{"name":"prepare"},"spans":[{"name":"execute"}]}
{"timestamp":"t3","level":"INFO","fields":{"message":"enter"},"target":"air::execution","span":{"name":"call"},"spans":[{"name":"execute"},{"name":"call"}]}
{"timestamp":"t4","level":"INFO","fields":{"message":"close","time.busy":"1.5ms","time.idle":"2µs"},"target":"air::execution","span":{"name":"call"},"spans":[{"name":"execute"}]}
{"timestamp":"t5","level":"WARN","fields":{"memory_size":1048576},"target":"air::runner"}
{"timestamp":"t6","level":"INFO","fields":{"message":"close","time.busy":"2ms","time.idle":"5µs"},"target":"air::runner","span":{"name":"execute"},"spans":[]}
"#;

fn run_events() -> Vec<TraceEvent> {
    read_events(RUN_LOG.as_bytes()).unwrap()
}

#[test]
fn test_well_nested_stream_leaves_empty_stack() {
    let mut reducer = SpanStackReducer::new();
    reducer.process(&run_events()).unwrap();

    assert!(reducer.open_spans().is_empty());
    assert_eq!(reducer.tree().len(), 3);
}

#[test]
fn test_log_reduces_to_expected_tree() {
    let mut reducer = SpanStackReducer::new();
    reducer.process(&run_events()).unwrap();

    let tree = reducer.tree();
    let execute = tree.child(None, "air::runner::execute").unwrap();
    let prepare = tree
        .child(Some(execute), "air::preparation::prepare")
        .unwrap();
    let call = tree.child(Some(execute), "air::execution::call").unwrap();

    assert_eq!(tree.node(execute).cumulative, Duration::from_millis(2));
    assert_eq!(tree.node(prepare).cumulative, Duration::from_micros(200));
    assert_eq!(tree.node(call).cumulative, Duration::from_micros(1500));
}

#[test]
fn test_repeats_are_averaged() {
    let events = run_events();
    let mut reducer = SpanStackReducer::new();
    for _ in 0..3 {
        reducer.process(&events).unwrap();
    }

    let reduction = reducer.finalize(3).unwrap();
    assert_eq!(reduction.total_time, Duration::from_millis(2));

    let call = reduction
        .tree
        .child(
            reduction.tree.child(None, "air::runner::execute"),
            "air::execution::call",
        )
        .unwrap();
    assert_eq!(
        reduction.tree.node(call).cumulative,
        Duration::from_micros(1500)
    );

    // one memory sample per run, all equal
    assert_eq!(reducer.memory().len(), 3);
    assert_eq!(
        reduction.memory_sizes,
        Some(("1.000 MiB".to_string(), "1.000 MiB".to_string()))
    );
}

#[test]
fn test_interleaved_stream_is_rejected() {
    let events = vec![
        TraceEvent::enter("a", Some("m"), &[]),
        TraceEvent::enter("b", Some("m"), &["a"]),
        TraceEvent::close("a", Some("m"), &["b"], Some("1ms")),
    ];

    let mut reducer = SpanStackReducer::new();
    assert!(matches!(
        reducer.process(&events),
        Err(ReduceError::StackMismatch { .. })
    ));
}

#[test]
fn test_truncated_stream_is_rejected() {
    let events = run_events();
    let truncated = &events[..events.len() - 1];

    let mut reducer = SpanStackReducer::new();
    assert_eq!(
        reducer.process(truncated).unwrap_err(),
        ReduceError::UnclosedSpans(vec!["air::runner::execute".to_string()])
    );
}

#[test]
fn test_collapse_uses_averaged_self_time() {
    let events = run_events();
    let mut reducer = SpanStackReducer::new();
    reducer.process(&events).unwrap();
    reducer.process(&events).unwrap();

    let reduction = reducer.finalize(2).unwrap();
    let stacks = collapse_tree(&reduction.tree);

    let execute_self = stacks
        .iter()
        .find(|s| s.stack == "air::runner::execute")
        .unwrap();
    assert_eq!(execute_self.weight, 300_000);

    let total: u64 = stacks.iter().map(|s| s.weight).sum();
    assert_eq!(total, 2_000_000);
}
