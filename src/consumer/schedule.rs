//! Report timer driving periodic output

use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use super::config::ReportSchedule;

/// Repeating report timer that can be cancelled
///
/// In summary mode the timer is never armed and `tick` never resolves,
/// so it can sit in a `select!` unconditionally.
#[derive(Debug)]
pub struct ReportTimer {
    interval: Option<Interval>,
}

impl ReportTimer {
    /// Arm the timer; the first tick fires one full period from now
    pub fn start(schedule: &ReportSchedule) -> Self {
        let interval = match schedule {
            ReportSchedule::Periodic { interval: period } => {
                let mut interval = time::interval_at(Instant::now() + *period, *period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                Some(interval)
            }
            ReportSchedule::Summary => None,
        };
        Self { interval }
    }

    /// Wait for the next tick
    pub async fn tick(&mut self) -> Instant {
        match self.interval.as_mut() {
            Some(interval) => interval.tick().await,
            None => std::future::pending().await,
        }
    }

    /// Disarm the timer; later calls to `tick` never resolve
    pub fn cancel(&mut self) {
        if self.interval.take().is_some() {
            debug!("Report timer cancelled");
        }
    }

    /// Whether the timer will still tick
    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }
}
