//! Line consumer for the stats engine
//!
//! Reads newline-delimited JSON from any async buffered reader, folds each
//! record into the stats store and writes a table report on a timer and once
//! more at end of input.
//!
//! # Example
//!
//! ```no_run
//! use json_stats::consumer::{EngineConfig, StatsConsumer};
//! use json_stats::aggregation::Operation;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = EngineConfig::builder()
//!     .metrics(["req.timers.getMetadata"])
//!     .operations(vec![Operation::Average])
//!     .decomposition("route")
//!     .summary(true)
//!     .build()?;
//!
//! let mut consumer = StatsConsumer::new(config);
//! let stdin = tokio::io::BufReader::new(tokio::io::stdin());
//! consumer.run(stdin, &mut std::io::stdout()).await?;
//! # Ok(())
//! # }
//! ```

/// Engine configuration and its builder
pub mod config;
/// The read and report loop
pub mod consumer;
/// Per-line parsing and routing
pub mod processor;
/// Report timer
pub mod schedule;

pub use config::{
    EngineConfig, EngineConfigBuilder, MalformedLinePolicy, ReportSchedule,
    DEFAULT_REPORT_INTERVAL,
};
pub use consumer::{RunSummary, StatsConsumer};
pub use processor::{LineProcessor, ProcessingStats};
pub use schedule::ReportTimer;
