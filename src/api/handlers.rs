//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{error, info, warn};

use crate::{
    engine::EngineError,
    state::{AppState, PresetId, TimerSnapshot},
};
use super::responses::{ApiResponse, HealthResponse, PresetListResponse, StatusResponse};

type ApiResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

/// Map an engine failure to a status code plus the last known snapshot
fn engine_failure(state: &AppState, action: &str, e: EngineError) -> (StatusCode, Json<ApiResponse>) {
    let status = match e {
        EngineError::UnknownPreset(_) => {
            warn!("{} rejected: {}", action, e);
            StatusCode::NOT_FOUND
        }
        EngineError::Unavailable => {
            error!("{} failed: {}", action, e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    (status, Json(ApiResponse::error(e.to_string(), state.timer.current())))
}

/// Handle GET /presets - List the preset catalog
pub async fn presets_handler(State(state): State<Arc<AppState>>) -> Json<PresetListResponse> {
    Json(PresetListResponse::from(state.timer.catalog()))
}

/// Handle POST /presets/:id/select - Select a preset, replacing the current timer
pub async fn select_preset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<usize>,
) -> ApiResult {
    match state.timer.select_preset(PresetId(id)).await {
        Ok(timer) => {
            info!("Select endpoint called - preset {} selected", id);
            let message = timer.status_label.clone();
            Ok(Json(ApiResponse::for_timer(message, timer)))
        }
        Err(e) => Err(engine_failure(&state, "Select", e)),
    }
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    match state.timer.start().await {
        Ok(timer) => {
            let message = if timer.is_running {
                format!("Countdown running from {}", timer.remaining)
            } else {
                "Nothing to start".to_string()
            };
            Ok(Json(ApiResponse::for_timer(message, timer)))
        }
        Err(e) => Err(engine_failure(&state, "Start", e)),
    }
}

/// Handle POST /stop - Halt the countdown, keeping remaining time
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    match state.timer.stop().await {
        Ok(timer) => {
            let message = format!("Countdown halted at {}", timer.remaining);
            Ok(Json(ApiResponse::for_timer(message, timer)))
        }
        Err(e) => Err(engine_failure(&state, "Stop", e)),
    }
}

/// Handle POST /reset - Restore the full preset duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    match state.timer.reset().await {
        Ok(timer) => {
            let message = format!("Countdown reset to {}", timer.remaining);
            Ok(Json(ApiResponse::for_timer(message, timer)))
        }
        Err(e) => Err(engine_failure(&state, "Reset", e)),
    }
}

/// Handle GET /status - Return the latest snapshot and server info
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        timer: state.timer.current(),
        alarm_output: state.alarm_output.to_string(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
    })
}

/// Handle GET /events - Stream every snapshot as a `timer` server-sent event
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let updates = state.timer.subscribe();

    let events = stream::unfold((updates, true), |(mut updates, first)| async move {
        if !first && updates.changed().await.is_err() {
            return None;
        }
        let snapshot = updates.borrow_and_update().clone();
        Some((Ok(snapshot_event(&snapshot)), (updates, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn snapshot_event(snapshot: &TimerSnapshot) -> Event {
    match Event::default().event("timer").json_data(snapshot) {
        Ok(event) => event,
        Err(e) => {
            error!("Failed to serialize snapshot: {}", e);
            Event::default().comment("snapshot unavailable")
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
