//! Line processor: parse, route and observe one input line at a time

use serde::Serialize;
use tracing::{debug, warn};

use super::config::MalformedLinePolicy;
use crate::aggregation::{AggregationConfig, ObservationRouter, StatsStore};
use crate::error::{Result, StatsError};
use crate::event::Record;

/// Counters describing what the processor has consumed so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    /// Every line read, blank ones included
    pub lines_read: u64,
    /// Lines that parsed as JSON
    pub records: u64,
    /// Lines that failed to parse
    pub malformed_lines: u64,
    /// Observations pushed into the store
    pub observations: u64,
}

/// Turns input lines into store observations
#[derive(Debug)]
pub struct LineProcessor {
    router: ObservationRouter,
    store: StatsStore,
    malformed_lines: MalformedLinePolicy,
    stats: ProcessingStats,
}

impl LineProcessor {
    /// Create a processor with an empty store
    pub fn new(config: &AggregationConfig, malformed_lines: MalformedLinePolicy) -> Self {
        Self {
            router: ObservationRouter::new(config),
            store: StatsStore::new(config.window_size),
            malformed_lines,
            stats: ProcessingStats::default(),
        }
    }

    /// Process one line of text, returning the number of observations it produced
    pub fn process_line(&mut self, line: &str) -> Result<usize> {
        self.process_bytes(line.as_bytes())
    }

    /// Process one raw line without its newline. Bytes that are not valid
    /// UTF-8 make the line malformed, like any other JSON syntax error.
    pub fn process_bytes(&mut self, line: &[u8]) -> Result<usize> {
        self.stats.lines_read += 1;

        if line.iter().all(u8::is_ascii_whitespace) {
            return Ok(0);
        }

        match Record::from_slice(line) {
            Ok(record) => Ok(self.process_record(&record)),
            Err(source) => {
                self.stats.malformed_lines += 1;
                let line_number = self.stats.lines_read;
                match self.malformed_lines {
                    MalformedLinePolicy::Fail => Err(StatsError::MalformedRecord {
                        line: line_number,
                        source,
                    }),
                    MalformedLinePolicy::Skip => {
                        warn!("Skipping malformed record on line {}: {}", line_number, source);
                        Ok(0)
                    }
                }
            }
        }
    }

    /// Route an already parsed record into the store
    pub fn process_record(&mut self, record: &Record) -> usize {
        self.stats.records += 1;

        let observations = self.router.route(record);
        let produced = observations.len();
        if produced == 0 {
            debug!("Record on line {} produced no observations", self.stats.lines_read);
        }

        for observation in observations {
            self.store.observe(observation.key, observation.value);
        }
        self.stats.observations += produced as u64;

        produced
    }

    /// Accumulated statistics
    pub fn store(&self) -> &StatsStore {
        &self.store
    }

    /// Counters so far
    pub fn stats(&self) -> ProcessingStats {
        self.stats
    }
}
