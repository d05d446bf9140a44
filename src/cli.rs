//! Command-line interface

use clap::Parser;
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::aggregation::Operation;
use crate::consumer::{EngineConfig, DEFAULT_REPORT_INTERVAL};
use crate::error::Result;

/// Report rolling statistics over JSON lines read from stdin
#[derive(Debug, Clone, Parser)]
#[command(name = "json-stats", version)]
#[command(about = "Compute rolling statistics over newline-delimited JSON", long_about = None)]
pub struct Cli {
    /// Comma-separated dotted field paths to aggregate
    #[arg(short, long, value_delimiter = ',', required = true, value_name = "FIELD[,FIELD...]")]
    pub metrics: Vec<String>,

    /// Comma-separated operations: sum, average, median, count, min, max
    #[arg(
        short,
        long,
        alias = "operation",
        value_delimiter = ',',
        required = true,
        value_name = "OP[,OP...]"
    )]
    pub operations: Vec<Operation>,

    /// Field whose value partitions the statistics
    #[arg(short, long, value_name = "FIELD")]
    pub decomp: Option<String>,

    /// Keep only the last NUM values per key
    #[arg(short, long, value_name = "NUM")]
    pub num: Option<NonZeroUsize>,

    /// Only print a report once input ends
    #[arg(short, long)]
    pub summary: bool,

    /// Do not print the header row
    #[arg(short = 'H', long)]
    pub no_header: bool,

    /// Print the decomposition value on every row
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Milliseconds between periodic reports
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_REPORT_INTERVAL.as_millis() as u64)]
    pub interval_ms: u64,

    /// Treat a missing metric as 0 instead of skipping it
    #[arg(long)]
    pub zero_fill: bool,

    /// Abort on the first line that is not valid JSON
    #[arg(long)]
    pub strict: bool,
}

impl Cli {
    /// Validate the parsed flags into an engine configuration
    pub fn into_config(self) -> Result<EngineConfig> {
        let mut builder = EngineConfig::builder()
            .metrics(self.metrics)
            .operations(self.operations)
            .window_size(self.num)
            .summary(self.summary)
            .interval(Duration::from_millis(self.interval_ms))
            .show_header(!self.no_header)
            .verbose(self.verbose)
            .zero_fill(self.zero_fill)
            .strict(self.strict);

        if let Some(decomp) = self.decomp {
            builder = builder.decomposition(decomp);
        }

        builder.build()
    }
}
