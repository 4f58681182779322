use crate::flamegraph::FlamegraphConfig;
use crate::utils::config::DEFAULT_REPORT_PATH;
use std::path::PathBuf;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// JSON-lines trace files, one per run
    pub traces: Vec<PathBuf>,

    /// Divisor for averaging; defaults to the number of trace files
    pub repeat: Option<u32>,

    /// Benchmark name
    pub bench_name: String,

    /// Free-form note stored in the report
    pub comment: String,

    /// Output path for JSON report
    pub output_json: PathBuf,

    /// Output path for text report (optional)
    pub output_text: Option<PathBuf>,

    /// Output path for SVG flamegraph (optional)
    pub output_svg: Option<PathBuf>,

    /// Flamegraph configuration
    pub flamegraph_config: Option<FlamegraphConfig>,

    /// Print text report to stdout
    pub print_summary: bool,
}

impl ReportArgs {
    /// Number of runs the durations are averaged over
    pub fn repeat_count(&self) -> u32 {
        self.repeat
            .unwrap_or_else(|| u32::try_from(self.traces.len()).unwrap_or(u32::MAX))
    }
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            traces: Vec::new(),
            repeat: None,
            bench_name: String::new(),
            comment: String::new(),
            output_json: PathBuf::from(DEFAULT_REPORT_PATH),
            output_text: None,
            output_svg: None,
            flamegraph_config: None,
            print_summary: false,
        }
    }
}
