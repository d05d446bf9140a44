//! Engine configuration structures

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::aggregation::{AggregationConfig, MissingMetricPolicy, Operation};
use crate::error::{Result, StatsError};
use crate::event::FieldPath;
use crate::report::ReportOptions;

/// Default delay between periodic reports
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_millis(1000);

/// When reports are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSchedule {
    /// Report on a repeating timer and once more at end of input
    Periodic {
        /// Time between reports
        interval: Duration,
    },
    /// Report once, at end of input
    Summary,
}

impl Default for ReportSchedule {
    fn default() -> Self {
        ReportSchedule::Periodic {
            interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

/// What to do with an input line that is not valid JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedLinePolicy {
    /// Log a warning, count the line and keep going
    #[default]
    Skip,
    /// Abort the run
    Fail,
}

/// Complete configuration for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Routing and aggregation settings
    pub aggregation: AggregationConfig,

    /// Report timing
    pub schedule: ReportSchedule,

    /// Table presentation
    pub report: ReportOptions,

    /// Handling of malformed input lines
    pub malformed_lines: MalformedLinePolicy,
}

impl EngineConfig {
    /// Create a new builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }
}

/// Builder for EngineConfig
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    metrics: Vec<String>,
    operations: Vec<Operation>,
    decomposition: Option<String>,
    window_size: Option<NonZeroUsize>,
    summary: bool,
    interval: Option<Duration>,
    show_header: bool,
    verbose: bool,
    missing_metric: MissingMetricPolicy,
    malformed_lines: MalformedLinePolicy,
}

impl EngineConfigBuilder {
    /// Create a new engine config builder
    pub fn new() -> Self {
        Self {
            show_header: true,
            ..Default::default()
        }
    }

    /// Set the metric field paths
    pub fn metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = metrics.into_iter().map(Into::into).collect();
        self
    }

    /// Set the operations, in column order
    pub fn operations(mut self, operations: Vec<Operation>) -> Self {
        self.operations = operations;
        self
    }

    /// Set the decomposition field; an empty string means none
    pub fn decomposition(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.decomposition = (!field.is_empty()).then_some(field);
        self
    }

    /// Bound each key's window
    pub fn window_size(mut self, size: Option<NonZeroUsize>) -> Self {
        self.window_size = size;
        self
    }

    /// Only report at end of input
    pub fn summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    /// Set the periodic report interval
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Print the header row
    pub fn show_header(mut self, show: bool) -> Self {
        self.show_header = show;
        self
    }

    /// Repeat the decomposition value on every row
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Observe zero for metrics absent from a record
    pub fn zero_fill(mut self, zero_fill: bool) -> Self {
        self.missing_metric = if zero_fill {
            MissingMetricPolicy::ZeroFill
        } else {
            MissingMetricPolicy::Skip
        };
        self
    }

    /// Abort on the first malformed line instead of skipping it
    pub fn strict(mut self, strict: bool) -> Self {
        self.malformed_lines = if strict {
            MalformedLinePolicy::Fail
        } else {
            MalformedLinePolicy::Skip
        };
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<EngineConfig> {
        let metrics = self
            .metrics
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(FieldPath::parse)
            .collect::<Result<Vec<_>>>()?;

        let mut aggregation = AggregationConfig::new(metrics, self.operations)
            .with_missing_metric(self.missing_metric);
        if let Some(field) = &self.decomposition {
            aggregation = aggregation.with_decomposition(FieldPath::parse(field)?);
        }
        if let Some(size) = self.window_size {
            aggregation = aggregation.with_window_size(size);
        }
        let aggregation = aggregation.validate()?;

        let schedule = match (self.summary, self.interval) {
            (true, _) => ReportSchedule::Summary,
            (false, Some(interval)) if interval.is_zero() => {
                return Err(StatsError::Configuration(
                    "report interval must be greater than zero".to_string(),
                ));
            }
            (false, interval) => ReportSchedule::Periodic {
                interval: interval.unwrap_or(DEFAULT_REPORT_INTERVAL),
            },
        };

        let mut report = ReportOptions::new(self.decomposition.as_deref().unwrap_or(""))
            .verbose(self.verbose);
        if !self.show_header {
            report = report.without_header();
        }

        Ok(EngineConfig {
            aggregation,
            schedule,
            report,
            malformed_lines: self.malformed_lines,
        })
    }
}
