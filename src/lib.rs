//! Countdown Chime - A drift-corrected countdown timer service
//!
//! This library provides a preset-driven countdown engine that derives the
//! remaining time from an absolute deadline, an alarm signaler that plays a
//! synthesized tone on completion, and an HTTP API for the view layer.

pub mod alarm;
pub mod api;
pub mod config;
pub mod engine;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use alarm::AlarmSignaler;
pub use api::create_router;
pub use config::Config;
pub use engine::{CountdownEngine, TimerHandle};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
