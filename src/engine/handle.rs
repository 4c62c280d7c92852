//! Cloneable front door to the engine task

use std::sync::Arc;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::warn;

use crate::{
    alarm::AlarmSignaler,
    state::{PresetCatalog, PresetId, TimerSnapshot},
    tasks::engine_task,
};
use super::{
    CountdownEngine, EngineCommand, EngineError, EngineSettings, TokioClock, TokioTickScheduler,
};

/// Sends operations to the engine task and reads its latest snapshot
#[derive(Debug, Clone)]
pub struct TimerHandle {
    commands: mpsc::UnboundedSender<EngineCommand>,
    snapshots: watch::Receiver<TimerSnapshot>,
    catalog: Arc<PresetCatalog>,
}

impl TimerHandle {
    /// Build an engine on the tokio clock and spawn the task that owns it
    pub fn spawn(
        catalog: Arc<PresetCatalog>,
        settings: EngineSettings,
        alarm: AlarmSignaler,
    ) -> (Self, JoinHandle<()>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (reporter, snapshots) = watch::channel(TimerSnapshot::default());

        let engine = CountdownEngine::new(
            Arc::clone(&catalog),
            settings,
            TokioClock,
            TokioTickScheduler::new(commands.clone()),
            alarm,
            reporter,
        );
        let task = tokio::spawn(engine_task(engine, receiver));

        let handle = Self {
            commands,
            snapshots,
            catalog,
        };
        (handle, task)
    }

    pub async fn select_preset(&self, id: PresetId) -> Result<TimerSnapshot, EngineError> {
        let (reply, response) = oneshot::channel();
        self.send(EngineCommand::SelectPreset { id, reply })?;
        response.await.map_err(|_| EngineError::Unavailable)?
    }

    pub async fn start(&self) -> Result<TimerSnapshot, EngineError> {
        let (reply, response) = oneshot::channel();
        self.send(EngineCommand::Start { reply })?;
        response.await.map_err(|_| EngineError::Unavailable)
    }

    pub async fn stop(&self) -> Result<TimerSnapshot, EngineError> {
        let (reply, response) = oneshot::channel();
        self.send(EngineCommand::Stop { reply })?;
        response.await.map_err(|_| EngineError::Unavailable)
    }

    pub async fn reset(&self) -> Result<TimerSnapshot, EngineError> {
        let (reply, response) = oneshot::channel();
        self.send(EngineCommand::Reset { reply })?;
        response.await.map_err(|_| EngineError::Unavailable)
    }

    /// Latest published snapshot
    pub fn current(&self) -> TimerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshots.clone()
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    /// Ask the engine task to cancel its ticker and exit
    pub fn shutdown(&self) {
        if self.commands.send(EngineCommand::Shutdown).is_err() {
            warn!("Engine task already stopped");
        }
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.commands
            .send(command)
            .map_err(|_| EngineError::Unavailable)
    }
}
