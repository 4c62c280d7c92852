//! Server-level application state shared with the HTTP handlers

use std::time::Instant;

use crate::engine::TimerHandle;

/// Everything a request handler needs: the engine handle plus server metadata
#[derive(Debug)]
pub struct AppState {
    /// Handle to the countdown engine task
    pub timer: TimerHandle,
    /// Name of the backend the alarm plays through
    pub alarm_output: &'static str,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    /// Create a new AppState around a running engine
    pub fn new(port: u16, host: String, timer: TimerHandle, alarm_output: &'static str) -> Self {
        Self {
            timer,
            alarm_output,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
