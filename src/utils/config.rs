//! Configuration and constants for the CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Separator between a span's target and its name, and between target segments
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Separator between frames of a folded flamegraph stack
pub const FOLDED_FRAME_SEPARATOR: &str = ";";

// Duration units accepted when parsing `time.busy` values.
// Order matters: every suffix ends in "s", so the bare seconds suffix goes last.
// Scales are nanoseconds per unit.
pub const PARSE_DURATION_UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1e3),
    ("us", 1e3),
    ("ms", 1e6),
    ("s", 1e9),
];

// Duration units used for rendering, largest first
pub const FORMAT_DURATION_UNITS: &[(&str, f64)] = &[
    ("s", 1e9),
    ("ms", 1e6),
    ("µs", 1e3),
    ("ns", 1.0),
];

// Binary byte prefixes for memory samples
pub const BYTE_UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];

// Field names carrying memory samples (tracing emits them as plain fields without a message)
pub const MEMORY_FIELD_NAMES: &[&str] = &["memory_size"];

// Field holding the busy time on close records (tracing-subscriber span events)
pub const BUSY_TIME_FIELD: &str = "time.busy";

/// Default path for the JSON report
pub const DEFAULT_REPORT_PATH: &str = "report.json";

/// Upper bound for the repeat count accepted on the command line
pub const MAX_REPEAT: u32 = 10_000;
