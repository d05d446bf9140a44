//! Rolling statistics over newline-delimited JSON
//!
//! This library reads a stream of JSON records, extracts numeric metrics by
//! dotted field path, optionally partitions them by the value of another
//! field, and keeps a count-bounded sliding window per (partition, metric)
//! key. Reports with sum, average, median and count columns are rendered as
//! fixed-width text tables, either periodically or once at end of input.
//!
//! # Example
//!
//! ```
//! use json_stats::aggregation::{AggregationConfig, Aggregator, ObservationRouter, Operation, StatsStore};
//! use json_stats::event::{FieldPath, Record};
//! use serde_json::json;
//!
//! # fn example() -> json_stats::Result<()> {
//! let config = AggregationConfig::new(
//!     vec![FieldPath::parse("req.timers.getMetadata")?],
//!     vec![Operation::Average],
//! )
//! .with_decomposition(FieldPath::parse("route")?)
//! .validate()?;
//!
//! let router = ObservationRouter::new(&config);
//! let mut store = StatsStore::new(config.window_size);
//!
//! let record = Record::new(json!({"route": "getrootdir", "req": {"timers": {"getMetadata": 19772}}}));
//! for observation in router.route(&record) {
//!     store.observe(observation.key, observation.value);
//! }
//!
//! let rows = Aggregator::new(config.operations.clone()).compute(&store);
//! assert_eq!(rows[0].values, vec![Some(19772.0)]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub use error::{Result, StatsError};
pub use event::{FieldPath, Record, Selector};

/// Error types
pub mod error;

/// Records and dotted-path field selection
pub mod event;

/// Windowed per-key statistics
pub mod aggregation;

/// Report rendering
pub mod report;

/// Line consumer and run loop
pub mod consumer;

/// Command-line interface
pub mod cli;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable selecting the log format (`json` or `text`)
pub const LOG_FORMAT_ENV: &str = "JSON_STATS_LOG_FORMAT";

/// Initialize the tracing subscriber
///
/// Logs go to stderr so they never mix with reports on stdout. The filter is
/// read from `RUST_LOG` and defaults to `warn`.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Tracing already initialized: {}", e);
    }
}
