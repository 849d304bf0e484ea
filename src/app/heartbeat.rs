//! The engine's single heartbeat.
//!
//! One background task sends [`AppEvent::Heartbeat`] every second for the
//! generation it was armed with. Arming replaces any running task and
//! cancelling aborts it, so at most one heartbeat is ever live.

use crate::app::event::AppEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

pub const HEARTBEAT_PERIOD: Duration = Duration::from_secs(1);

pub struct Heartbeat {
    event_tx: mpsc::UnboundedSender<AppEvent>,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl Heartbeat {
    pub fn new(event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self::with_period(event_tx, HEARTBEAT_PERIOD)
    }

    fn with_period(event_tx: mpsc::UnboundedSender<AppEvent>, period: Duration) -> Self {
        Self {
            event_tx,
            period,
            task: None,
        }
    }

    /// Start ticking for `generation`, replacing any previous heartbeat.
    pub fn arm(&mut self, generation: u64) {
        self.cancel();
        debug!(generation, "heartbeat armed");

        let tx = self.event_tx.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            // The engine measures real elapsed time, so missed ticks need no replay.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(AppEvent::Heartbeat { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    /// Stop ticking. Safe to call when nothing is armed.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("heartbeat cancelled");
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.cancel();
    }
}
