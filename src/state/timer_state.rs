//! Timer state structure and management

use serde::Serialize;
use tokio::time::Instant;

use crate::engine::ScheduledTask;
use super::{Preset, PresetId};

/// How a halted countdown is labelled to the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StopStyle {
    /// Report "Stopped"
    #[default]
    Stop,
    /// Report "Paused"
    Pause,
}

impl StopStyle {
    pub fn label(self) -> &'static str {
        match self {
            StopStyle::Stop => "Stopped",
            StopStyle::Pause => "Paused",
        }
    }
}

/// Last transition the timer went through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerStatus {
    /// No preset selected
    #[default]
    Idle,
    Ready,
    Running,
    Stopped,
    Done,
    Reset,
}

impl TimerStatus {
    /// Human-readable status text shown next to the display
    pub fn label(self, preset: Option<&Preset>, style: StopStyle) -> String {
        match self {
            TimerStatus::Idle => String::new(),
            TimerStatus::Ready => match preset {
                Some(preset) => format!("Ready: {}", preset.label),
                None => "Ready".to_string(),
            },
            TimerStatus::Running => "Running".to_string(),
            TimerStatus::Stopped => style.label().to_string(),
            TimerStatus::Done => "Done".to_string(),
            TimerStatus::Reset => "Reset".to_string(),
        }
    }
}

/// Countdown record owned by a single engine
#[derive(Debug, Default)]
pub struct TimerState {
    /// Duration of the selected preset, 0 when none is selected
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub is_running: bool,
    /// Active correction task; present iff `is_running`
    pub scheduled_task: Option<ScheduledTask>,
    /// Absolute end of the current run; present iff `is_running`
    pub deadline: Option<Instant>,
    pub selected_preset: Option<PresetId>,
    pub status: TimerStatus,
}

impl TimerState {
    /// Create the zero-valued bootstrap state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh state for a newly selected preset
    pub fn ready(id: PresetId, preset: &Preset) -> Self {
        Self {
            total_seconds: preset.seconds,
            remaining_seconds: preset.seconds,
            is_running: false,
            scheduled_task: None,
            deadline: None,
            selected_preset: Some(id),
            status: TimerStatus::Ready,
        }
    }

    pub fn has_preset(&self) -> bool {
        self.total_seconds > 0
    }

    /// Whether `start` would arm a countdown
    pub fn can_start(&self) -> bool {
        self.has_preset() && !self.is_running && self.remaining_seconds > 0
    }

    /// Detach the running correction task, leaving the state stopped
    pub fn halt(&mut self) -> Option<ScheduledTask> {
        self.is_running = false;
        self.deadline = None;
        self.scheduled_task.take()
    }
}
