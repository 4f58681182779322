//! Trace Metering CLI
//!
//! Builds averaged call-tree timing reports from tracing span event logs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use trace_metering::commands::{
    display_schema, display_version, execute_report, validate_args, validate_report_file,
    ReportArgs,
};
use trace_metering::flamegraph::FlamegraphConfig;
use trace_metering::utils::config::DEFAULT_REPORT_PATH;

/// Trace Metering - call-tree timing reports from span event logs
#[derive(Parser, Debug)]
#[command(name = "trace-meter")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Reduce trace logs of one benchmark into a report
    Report {
        /// JSON-lines trace file, one per run (repeatable)
        #[arg(short, long = "trace", required = true)]
        traces: Vec<PathBuf>,

        /// Number of runs to average over (defaults to the number of trace files)
        #[arg(long, env = "TRACE_METER_REPEAT")]
        repeat: Option<u32>,

        /// Benchmark name
        #[arg(short, long)]
        name: String,

        /// Free-form note stored in the report
        #[arg(short, long, default_value = "")]
        comment: String,

        /// Output path for JSON report
        #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
        output: PathBuf,

        /// Output path for text report (optional)
        #[arg(long)]
        text: Option<PathBuf>,

        /// Output path for SVG flamegraph (optional)
        #[arg(short, long)]
        flamegraph: Option<PathBuf>,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,

        /// Print text report to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Report {
            traces,
            repeat,
            name,
            comment,
            output,
            text,
            flamegraph,
            title,
            width,
            summary,
        } => {
            let fg_config = flamegraph.as_ref().map(|_| {
                let config = FlamegraphConfig::new().with_width(width);
                match title {
                    Some(title) => config.with_title(title),
                    None => config.with_title(name.clone()),
                }
            });

            let args = ReportArgs {
                traces,
                repeat,
                bench_name: name,
                comment,
                output_json: output,
                output_text: text,
                output_svg: flamegraph,
                flamegraph_config: fg_config,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_report(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
