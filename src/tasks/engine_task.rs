//! Countdown engine background task

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::{Clock, CountdownEngine, EngineCommand, TickScheduler};

/// Owns the engine and applies commands one at a time, in arrival order
pub async fn engine_task<C, S>(
    mut engine: CountdownEngine<C, S>,
    mut commands: mpsc::UnboundedReceiver<EngineCommand>,
) where
    C: Clock,
    S: TickScheduler,
{
    info!("Starting countdown engine task");

    while let Some(command) = commands.recv().await {
        match command {
            EngineCommand::SelectPreset { id, reply } => {
                let _ = reply.send(engine.select_preset(id));
            }
            EngineCommand::Start { reply } => {
                let _ = reply.send(engine.start());
            }
            EngineCommand::Stop { reply } => {
                let _ = reply.send(engine.stop());
            }
            EngineCommand::Reset { reply } => {
                let _ = reply.send(engine.reset());
            }
            EngineCommand::Tick { task_id } => {
                if let Some(snapshot) = engine.on_tick(task_id) {
                    debug!("Correction tick {}: {}", task_id, snapshot.remaining);
                }
            }
            EngineCommand::Shutdown => {
                info!("Shutdown requested, stopping countdown engine");
                break;
            }
        }
    }

    engine.shutdown();
    info!("Countdown engine task stopped");
}
