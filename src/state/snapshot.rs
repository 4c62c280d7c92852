//! Snapshots reported to the view layer after every transition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PresetId;

/// Format seconds as `MM:SS`; minutes are not capped at 59
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Which controls the view should enable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Controls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub reset_enabled: bool,
}

/// Point-in-time view of the countdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Increases by one with every reported transition
    pub revision: u64,
    pub remaining: String,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub is_running: bool,
    pub has_preset: bool,
    pub selected_preset: Option<PresetId>,
    pub status_label: String,
    pub controls: Controls,
    /// Estimated wall-clock completion time while running
    pub ends_at: Option<DateTime<Utc>>,
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self {
            revision: 0,
            remaining: format_time(0),
            remaining_seconds: 0,
            total_seconds: 0,
            is_running: false,
            has_preset: false,
            selected_preset: None,
            status_label: String::new(),
            controls: Controls::default(),
            ends_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(300), "05:00");
        assert_eq!(format_time(59), "00:59");
    }

    #[test]
    fn minutes_are_unbounded() {
        assert_eq!(format_time(6000), "100:00");
        assert_eq!(format_time(3661), "61:01");
    }

    #[test]
    fn bootstrap_snapshot_disables_everything() {
        let snapshot = TimerSnapshot::default();
        assert_eq!(snapshot.remaining, "00:00");
        assert_eq!(snapshot.controls, Controls::default());
        assert!(snapshot.status_label.is_empty());
    }
}
