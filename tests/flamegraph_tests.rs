use trace_metering::aggregator::{collapse_tree, SpanStackReducer};
use trace_metering::flamegraph::{generate_flamegraph, FlamegraphConfig};
use trace_metering::output::write_svg;
use trace_metering::parser::TraceEvent;

fn sample_stacks() -> Vec<trace_metering::aggregator::CollapsedStack> {
    let events = vec![
        TraceEvent::enter("run", Some("bench"), &[]),
        TraceEvent::enter("call", Some("air::execution"), &["run"]),
        TraceEvent::close("call", Some("air::execution"), &["run"], Some("3ms")),
        TraceEvent::close("run", Some("bench"), &[], Some("4ms")),
    ];

    let mut reducer = SpanStackReducer::new();
    reducer.process(&events).unwrap();
    collapse_tree(&reducer.finalize(1).unwrap().tree)
}

#[test]
fn test_collapsed_lines() {
    let lines: Vec<String> = sample_stacks().iter().map(|s| s.to_line()).collect();
    assert_eq!(
        lines,
        vec![
            "bench::run;air::execution::call 3000000".to_string(),
            "bench::run 1000000".to_string(),
        ]
    );
}

#[test]
fn test_flamegraph_with_title() {
    let config = FlamegraphConfig::new()
        .with_title("fold benchmark")
        .with_width(800);

    let svg = generate_flamegraph(&sample_stacks(), Some(&config)).unwrap();

    assert!(svg.contains("<svg"));
    assert!(svg.contains("fold benchmark"));
}

#[test]
fn test_flamegraph_to_file() {
    let svg = generate_flamegraph(&sample_stacks(), None).unwrap();
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("flamegraph.svg");

    write_svg(&svg, &path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_flamegraph_empty_tree() {
    let stacks = collapse_tree(&Default::default());
    assert!(generate_flamegraph(&stacks, None).is_err());
}
