//! Messages processed by the engine task

use tokio::sync::oneshot;

use crate::state::{PresetId, TimerSnapshot};
use super::{EngineError, TaskId};

pub type Reply<T> = oneshot::Sender<T>;

/// Inputs to the countdown engine, handled one at a time
#[derive(Debug)]
pub enum EngineCommand {
    SelectPreset {
        id: PresetId,
        reply: Reply<Result<TimerSnapshot, EngineError>>,
    },
    Start {
        reply: Reply<TimerSnapshot>,
    },
    Stop {
        reply: Reply<TimerSnapshot>,
    },
    Reset {
        reply: Reply<TimerSnapshot>,
    },
    /// Sent by the correction ticker that was armed with `task_id`
    Tick {
        task_id: TaskId,
    },
    Shutdown,
}
