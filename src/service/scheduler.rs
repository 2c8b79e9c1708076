//! Wall-clock refresh scheduler.
//!
//! Fires the [`RefreshJob`] at every UTC hour boundary whose hour is a
//! multiple of the configured interval (the `0 */N * * *` cron pattern).
//! The next fire time is always computed from the clock after a run
//! finishes, so a slow run never shifts later boundaries.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::RefreshJob;

/// Returns the first hour boundary strictly after `after` whose hour is a
/// multiple of `every_hours`.
///
/// `every_hours` is clamped to `1..=24`.
#[must_use]
pub fn next_boundary(after: DateTime<Utc>, every_hours: u32) -> DateTime<Utc> {
    let every = every_hours.clamp(1, 24);
    let hour_start = after
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(after);

    let mut candidate = hour_start + TimeDelta::hours(1);
    while candidate.hour() % every != 0 {
        candidate += TimeDelta::hours(1);
    }
    candidate
}

/// Spawns and owns the recurring refresh task.
#[derive(Debug)]
pub struct RefreshScheduler {
    job: Arc<RefreshJob>,
    every_hours: u32,
}

impl RefreshScheduler {
    /// Creates a scheduler running `job` every `every_hours` hours.
    #[must_use]
    pub fn new(job: Arc<RefreshJob>, every_hours: u32) -> Self {
        Self {
            job,
            every_hours: every_hours.clamp(1, 24),
        }
    }

    /// Starts the timer task on the current tokio runtime.
    #[must_use]
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut last_fired: Option<DateTime<Utc>> = None;
            loop {
                let now = Utc::now();
                let from = last_fired.map_or(now, |fired| fired.max(now));
                let next = next_boundary(from, self.every_hours);
                let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
                tracing::debug!(next = %next, "next refresh scheduled");

                tokio::select! {
                    () = tokio::time::sleep(wait) => {
                        last_fired = Some(next);
                        self.job.run_logged().await;
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
            tracing::info!("refresh scheduler stopped");
        });

        SchedulerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle to a running [`RefreshScheduler`] task.
#[derive(Debug)]
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signals the task to stop and waits for it to exit.
    ///
    /// A refresh cycle already in progress runs to completion first.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "refresh scheduler task ended abnormally");
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{CoinId, PriceQuote};
    use crate::error::StatsError;
    use crate::persistence::MemorySnapshotStore;
    use crate::upstream::PriceSource;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        let Some(t) = Utc.with_ymd_and_hms(2024, 5, 17, h, m, s).single() else {
            panic!("valid timestamp");
        };
        t
    }

    #[test]
    fn next_boundary_every_two_hours() {
        assert_eq!(next_boundary(at(9, 15, 30), 2), at(10, 0, 0));
        assert_eq!(next_boundary(at(10, 0, 0), 2), at(12, 0, 0));
        assert_eq!(next_boundary(at(11, 59, 59), 2), at(12, 0, 0));
    }

    #[test]
    fn next_boundary_rolls_over_midnight() {
        let Some(midnight) = Utc.with_ymd_and_hms(2024, 5, 18, 0, 0, 0).single() else {
            panic!("valid timestamp");
        };
        assert_eq!(next_boundary(at(23, 10, 0), 2), midnight);
        assert_eq!(next_boundary(at(1, 0, 0), 24), midnight);
    }

    #[test]
    fn next_boundary_clamps_interval() {
        assert_eq!(next_boundary(at(9, 15, 0), 0), at(10, 0, 0));
    }

    #[derive(Debug)]
    struct EmptySource;

    #[async_trait]
    impl PriceSource for EmptySource {
        async fn fetch_prices(
            &self,
            _coin_ids: &[CoinId],
        ) -> Result<HashMap<CoinId, PriceQuote>, StatsError> {
            Ok(HashMap::new())
        }

        fn source_name(&self) -> &'static str {
            "empty"
        }
    }

    #[tokio::test]
    async fn shutdown_stops_the_task_promptly() {
        let job = Arc::new(RefreshJob::new(
            Arc::new(EmptySource),
            Arc::new(MemorySnapshotStore::new()),
            Vec::new(),
        ));
        let handle = RefreshScheduler::new(job, 2).spawn();

        let stopped = tokio::time::timeout(Duration::from_secs(2), handle.shutdown()).await;
        assert!(stopped.is_ok());
    }
}
