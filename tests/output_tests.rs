use pretty_assertions::assert_eq;
use std::path::Path;
use std::time::Duration;
use trace_metering::aggregator::SpanStackReducer;
use trace_metering::output::validate_path;
use trace_metering::output::{
    compress, read_report, render_text_report, to_report, write_report, write_svg,
    write_text_report,
};
use trace_metering::parser::{BenchReport, StatsEntry, TraceEvent};
use tempfile::NamedTempFile;

fn sample_events() -> Vec<TraceEvent> {
    vec![
        TraceEvent::enter("execute", Some("air::runner"), &[]),
        TraceEvent::enter("prepare", Some("air::preparation"), &["execute"]),
        TraceEvent::close("prepare", Some("air::preparation"), &["execute"], Some("200µs")),
        TraceEvent::enter("call", Some("air::execution"), &["execute"]),
        TraceEvent::close("call", Some("air::execution"), &["execute"], Some("1.5ms")),
        TraceEvent::metric("memory_size", 512),
        TraceEvent::close("execute", Some("air::runner"), &[], Some("2ms")),
    ]
}

fn create_test_report() -> BenchReport {
    let mut reducer = SpanStackReducer::new();
    reducer.process(&sample_events()).unwrap();
    let reduction = reducer.finalize(1).unwrap();
    to_report("fold", "baseline", 1, &reduction)
}

#[test]
fn test_report_nests_and_compresses() {
    let report = create_test_report();

    assert_eq!(report.total_time, "2.00ms");
    assert_eq!(report.common_prefix, "");
    assert_eq!(
        report.memory_sizes,
        Some(["512 B".to_string(), "512 B".to_string()])
    );

    let StatsEntry::Nested(execute) = &report.stats["air::runner::execute"] else {
        panic!("execute should have children");
    };
    assert_eq!(execute.duration, "2.00ms");
    assert_eq!(execute.common_prefix, "air");
    assert_eq!(
        execute.nested.keys().collect::<Vec<_>>(),
        vec!["execution::call", "preparation::prepare"]
    );
    assert_eq!(
        execute.nested["execution::call"],
        StatsEntry::Leaf("1.50ms".to_string())
    );
    assert_eq!(
        execute.nested["preparation::prepare"],
        StatsEntry::Leaf("200.00µs".to_string())
    );
}

#[test]
fn test_single_top_level_span() {
    let events = vec![
        TraceEvent::enter("X", None, &[]),
        TraceEvent::close("X", None, &[], Some("100ms")),
    ];
    let mut reducer = SpanStackReducer::new();
    reducer.process(&events).unwrap();
    let reduction = reducer.finalize(1).unwrap();

    let stats = compress(&reduction.tree);
    assert_eq!(stats.common_prefix, "");
    assert_eq!(stats.entries.len(), 1);
    assert_eq!(stats.entries["X"], StatsEntry::Leaf("100.00ms".to_string()));
}

#[test]
fn test_averaged_report_over_repeats() {
    let slow = vec![
        TraceEvent::enter("X", None, &[]),
        TraceEvent::close("X", None, &[], Some("30ms")),
    ];
    let fast = vec![
        TraceEvent::enter("X", None, &[]),
        TraceEvent::close("X", None, &[], Some("10ms")),
    ];

    let mut reducer = SpanStackReducer::new();
    reducer.process(&slow).unwrap();
    reducer.process(&fast).unwrap();
    let report = to_report("x", "", 2, &reducer.finalize(2).unwrap());

    assert_eq!(report.repeat, 2);
    assert_eq!(report.total_time, "20.00ms");
    assert_eq!(report.stats["X"].duration(), "20.00ms");
    assert_eq!(reducer.tree().total(), Duration::from_millis(40));
}

#[test]
fn test_write_and_read_report() {
    let report = create_test_report();
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    // Write
    write_report(&report, path).unwrap();

    // Read back
    let loaded = read_report(path).unwrap();

    assert_eq!(loaded, report);
}

#[test]
fn test_text_report_layout() {
    let report = create_test_report();
    let text = render_text_report(&report);

    assert_eq!(
        text,
        "fold (2.00ms; 512 B, 512 B): baseline\n\
         \x20 air::runner::execute: 2.00ms [air]\n\
         \x20   execution::call: 1.50ms\n\
         \x20   preparation::prepare: 200.00µs\n"
    );
}

#[test]
fn test_write_text_report() {
    let report = create_test_report();
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("fold.txt");

    write_text_report(&report, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, render_text_report(&report));
}

#[test]
fn test_validate_output_path_empty() {
    let result = validate_path(Path::new(""));
    assert!(result.is_err());
}

#[test]
fn test_validate_output_path_directory() {
    // Try to write to a directory path
    let temp_dir = tempfile::tempdir().unwrap();
    let result = validate_path(temp_dir.path());
    assert!(result.is_err());
}

#[test]
fn test_write_creates_parent_dirs() {
    let report = create_test_report();
    let temp_dir = tempfile::tempdir().unwrap();
    let nested = temp_dir.path().join("reports").join("fold").join("report.json");

    write_report(&report, &nested).unwrap();
    assert!(nested.exists());
}

#[test]
fn test_write_svg() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("out.svg");

    write_svg("<svg></svg>", &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, "<svg></svg>");
}
