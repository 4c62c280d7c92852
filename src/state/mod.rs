//! State management module
//!
//! This module contains the countdown record, the preset catalog, the
//! snapshots reported outward and the server-level application state.

pub mod app_state;
pub mod preset;
pub mod snapshot;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use preset::{Preset, PresetCatalog, PresetId};
pub use snapshot::{format_time, Controls, TimerSnapshot};
pub use timer_state::{StopStyle, TimerState, TimerStatus};
