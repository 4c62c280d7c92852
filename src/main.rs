//! Countdown Chime - A drift-corrected countdown timer service
//!
//! This is the main entry point for the countdown-chime application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use countdown_chime::{
    alarm::{backend_for, AlarmSignaler},
    api::create_router,
    config::Config,
    engine::TimerHandle,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_chime={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-chime server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms, stop_style={:?}, tone={:?}",
        config.host, config.port, config.tick_ms, config.stop_style, config.tone
    );

    let catalog = Arc::new(config.catalog());
    for (id, preset) in catalog.iter() {
        info!("  preset {}: {} ({}s)", id, preset.label, preset.seconds);
    }

    let alarm = AlarmSignaler::new(backend_for(config.alarm_output), config.tone);
    let alarm_output = alarm.backend_name();
    if !alarm.is_available() {
        warn!("No audio output configured, alarms will be silent");
    }

    // Start the engine task that owns the countdown
    let (timer, engine) = TimerHandle::spawn(catalog, config.engine_settings(), alarm);

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        timer.clone(),
        alarm_output,
    ));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /presets             - List presets");
    info!("  POST /presets/:id/select  - Select a preset");
    info!("  POST /start               - Start or resume the countdown");
    info!("  POST /stop                - Halt the countdown");
    info!("  POST /reset               - Restore the preset duration");
    info!("  GET  /status              - Current snapshot");
    info!("  GET  /events              - Snapshot stream (SSE)");
    info!("  GET  /health              - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    timer.shutdown();
    if let Err(e) = engine.await {
        tracing::error!("Engine task failed: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
