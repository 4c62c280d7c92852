//! Periodic correction ticker

use std::time::Duration;
use tokio::{
    sync::mpsc,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::engine::{EngineCommand, TaskId};

/// Asks the engine to recompute remaining time every `period`
///
/// The ticker never touches timer state; it only posts `Tick` messages and
/// exits when the engine is gone. Cancellation is done by aborting the task.
pub async fn correction_ticker(
    task_id: TaskId,
    period: Duration,
    commands: mpsc::UnboundedSender<EngineCommand>,
) {
    debug!("Correction task {} armed every {:?}", task_id, period);

    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if commands.send(EngineCommand::Tick { task_id }).is_err() {
            debug!("Engine gone, correction task {} exiting", task_id);
            break;
        }
    }
}
