//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Preset, PresetCatalog, PresetId, TimerSnapshot};

/// API response structure for timer operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Response whose status reflects whether the countdown is running
    pub fn for_timer(message: String, timer: TimerSnapshot) -> Self {
        let status = if timer.is_running { "running" } else { "idle" };
        Self::new(status.to_string(), message, timer)
    }

    /// Create an error response
    pub fn error(message: String, timer: TimerSnapshot) -> Self {
        Self::new("error".to_string(), message, timer)
    }
}

/// One catalog entry with its id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetEntry {
    pub id: PresetId,
    #[serde(flatten)]
    pub preset: Preset,
}

/// Preset catalog response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetListResponse {
    pub presets: Vec<PresetEntry>,
}

impl From<&PresetCatalog> for PresetListResponse {
    fn from(catalog: &PresetCatalog) -> Self {
        Self {
            presets: catalog
                .iter()
                .map(|(id, preset)| PresetEntry {
                    id,
                    preset: preset.clone(),
                })
                .collect(),
        }
    }
}

/// Status response with server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub alarm_output: String,
    pub uptime: String,
    pub port: u16,
    pub host: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
