use super::types::{StatusReport, TaskId};
use crate::error::ApiError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, task_id: &TaskId) -> Result<StatusReport, ApiError>;
}

/// Paces the poll loop. Tests substitute a ticker that never sleeps.
#[async_trait]
pub trait Ticker: Send {
    async fn tick(&mut self);
}

/// Fixed-delay ticker whose first tick fires one period after creation.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

#[derive(Debug)]
pub enum PollEvent {
    /// A status answer. The last one of a successful run has `status == Completed`.
    Status(StatusReport),
    Failed(ApiError),
}

/// Polls `source` once per tick until the task completes or a request fails.
///
/// Every answer is handed to `on_event` before the loop decides whether to stop,
/// so the final counters are always observed ahead of the results.
pub async fn run_poll_loop<S, T, F>(source: &S, ticker: &mut T, task_id: &TaskId, mut on_event: F)
where
    S: StatusSource + ?Sized,
    T: Ticker + ?Sized,
    F: FnMut(PollEvent),
{
    info!(task_id = %task_id, "polling started");
    loop {
        ticker.tick().await;

        match source.fetch_status(task_id).await {
            Ok(report) => {
                debug!(
                    task_id = %task_id,
                    completed = report.completed,
                    total = report.total,
                    "status tick"
                );
                let done = report.is_completed();
                on_event(PollEvent::Status(report));
                if done {
                    info!(task_id = %task_id, "polling finished");
                    return;
                }
            }
            Err(err) => {
                warn!(task_id = %task_id, error = %err, "status check failed");
                on_event(PollEvent::Failed(err));
                return;
            }
        }
    }
}
