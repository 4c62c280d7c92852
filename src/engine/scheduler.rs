//! Arming and cancelling the periodic correction task

use std::{fmt, time::Duration};
use tokio::{sync::mpsc, task::AbortHandle};
use tracing::debug;

use crate::tasks::correction_ticker;
use super::EngineCommand;

/// Identifies one armed correction task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to an armed correction task
///
/// Cancelling (or dropping) the handle aborts the task synchronously. Ticks it
/// already queued are still delivered, so the engine also compares ids.
#[derive(Debug)]
pub struct ScheduledTask {
    id: TaskId,
    abort: Option<AbortHandle>,
}

impl ScheduledTask {
    pub fn new(id: TaskId, abort: Option<AbortHandle>) -> Self {
        Self { id, abort }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancel(mut self) {
        self.abort_task();
    }

    fn abort_task(&mut self) {
        if let Some(abort) = self.abort.take() {
            debug!("Aborting correction task {}", self.id);
            abort.abort();
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.abort_task();
    }
}

/// Something that can arm a periodic correction task
pub trait TickScheduler: Send + 'static {
    /// Arm a task that delivers `EngineCommand::Tick { task_id: id }` every `period`
    fn schedule(&mut self, id: TaskId, period: Duration) -> ScheduledTask;
}

/// Spawns correction tickers on the tokio runtime
#[derive(Debug, Clone)]
pub struct TokioTickScheduler {
    commands: mpsc::UnboundedSender<EngineCommand>,
}

impl TokioTickScheduler {
    pub fn new(commands: mpsc::UnboundedSender<EngineCommand>) -> Self {
        Self { commands }
    }
}

impl TickScheduler for TokioTickScheduler {
    fn schedule(&mut self, id: TaskId, period: Duration) -> ScheduledTask {
        let commands = self.commands.clone();
        let handle = tokio::spawn(correction_ticker(id, period, commands));
        ScheduledTask::new(id, Some(handle.abort_handle()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn cancelled_ticker_stops_sending() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioTickScheduler::new(tx);

        let task = scheduler.schedule(TaskId(7), Duration::from_millis(200));
        tokio::time::sleep(Duration::from_millis(450)).await;

        let mut ticks = 0;
        while let Ok(command) = rx.try_recv() {
            assert!(matches!(command, EngineCommand::Tick { task_id } if task_id == TaskId(7)));
            ticks += 1;
        }
        assert_eq!(ticks, 2);

        task.cancel();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_aborts_the_ticker() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioTickScheduler::new(tx);

        drop(scheduler.schedule(TaskId(1), Duration::from_millis(200)));
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(rx.try_recv().is_err());
    }
}
