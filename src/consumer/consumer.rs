//! Sequential ingest/report loop

use serde::Serialize;
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use super::config::{EngineConfig, ReportSchedule};
use super::processor::{LineProcessor, ProcessingStats};
use super::schedule::ReportTimer;
use crate::aggregation::{Aggregator, MergedRow, StatsStore, StoreStatistics};
use crate::error::Result;
use crate::report::TableEmitter;

/// Totals for a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Input counters
    pub processing: ProcessingStats,
    /// Store size at the end of the run
    pub store: StoreStatistics,
    /// Reports written, the final one included
    pub reports: u64,
}

/// Reads JSON lines, accumulates statistics and writes reports
///
/// Ingestion and reporting run on one task, so a report always sees a
/// consistent store.
#[derive(Debug)]
pub struct StatsConsumer {
    processor: LineProcessor,
    aggregator: Aggregator,
    emitter: TableEmitter,
    schedule: ReportSchedule,
    reports: u64,
}

impl StatsConsumer {
    /// Create a consumer from a validated configuration
    pub fn new(config: EngineConfig) -> Self {
        let operations = config.aggregation.operations.clone();
        Self {
            processor: LineProcessor::new(&config.aggregation, config.malformed_lines),
            aggregator: Aggregator::new(operations.clone()),
            emitter: TableEmitter::new(config.report, operations),
            schedule: config.schedule,
            reports: 0,
        }
    }

    /// Consume `input` until end of file, writing reports to `out`
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<RunSummary>
    where
        R: AsyncBufRead + Unpin,
        W: Write + ?Sized,
    {
        self.run_until(input, out, std::future::pending::<()>()).await
    }

    /// Like [`run`](Self::run), but also stop once `shutdown` resolves
    ///
    /// Either way exactly one final report is written after the timer is
    /// cancelled.
    pub async fn run_until<R, W, F>(&mut self, input: R, out: &mut W, shutdown: F) -> Result<RunSummary>
    where
        R: AsyncBufRead + Unpin,
        W: Write + ?Sized,
        F: Future<Output = ()>,
    {
        info!("Starting stats consumer ({:?})", self.schedule);

        let mut lines = input.split(b'\n');
        let mut timer = ReportTimer::start(&self.schedule);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown requested, writing final report");
                    break;
                }
                _ = timer.tick() => {
                    debug!("Report timer fired");
                    self.emit_report(out)?;
                }
                line = lines.next_segment() => {
                    match line? {
                        Some(line) => {
                            self.processor.process_bytes(&line)?;
                        }
                        None => {
                            debug!("End of input");
                            break;
                        }
                    }
                }
            }
        }

        timer.cancel();
        self.emit_report(out)?;

        let summary = self.summary();
        info!(
            "Processed {} lines ({} records, {} malformed, {} observations) into {} keys; {} reports written",
            summary.processing.lines_read,
            summary.processing.records,
            summary.processing.malformed_lines,
            summary.processing.observations,
            summary.store.keys,
            summary.reports
        );
        Ok(summary)
    }

    /// Feed one line without going through the run loop
    pub fn ingest_line(&mut self, line: &str) -> Result<usize> {
        self.processor.process_line(line)
    }

    /// Compute the current rows
    pub fn report(&self) -> Vec<MergedRow> {
        self.aggregator.compute(self.processor.store())
    }

    /// Render the current rows to `out`
    pub fn emit_report<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<()> {
        let rows = self.report();
        self.emitter.emit(&rows, out)?;
        self.reports += 1;
        debug!("Wrote report {} with {} rows", self.reports, rows.len());
        Ok(())
    }

    /// Accumulated statistics
    pub fn store(&self) -> &StatsStore {
        self.processor.store()
    }

    /// Counters so far
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            processing: self.processor.stats(),
            store: self.processor.store().statistics(),
            reports: self.reports,
        }
    }
}
