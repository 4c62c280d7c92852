//! Countdown state machine with deadline-based correction

use std::{sync::Arc, time::Duration};
use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    alarm::AlarmSignaler,
    state::{
        format_time, Controls, PresetCatalog, PresetId, StopStyle, TimerSnapshot, TimerState,
        TimerStatus,
    },
};
use super::{Clock, EngineError, TaskId, TickScheduler};

/// Tunables fixed at engine construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Period of the correction ticker
    pub tick_interval: Duration,
    pub stop_style: StopStyle,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            stop_style: StopStyle::Stop,
        }
    }
}

/// Owns one timer and drives it through select / start / stop / reset
///
/// Remaining time is always derived from `deadline - now` on each correction
/// tick, never decremented, so late or bunched ticks cannot accumulate drift.
/// Every transition publishes a [`TimerSnapshot`] on the watch channel before
/// the operation returns.
pub struct CountdownEngine<C, S> {
    state: TimerState,
    catalog: Arc<PresetCatalog>,
    settings: EngineSettings,
    clock: C,
    scheduler: S,
    alarm: AlarmSignaler,
    reporter: watch::Sender<TimerSnapshot>,
    revision: u64,
    next_task_id: u64,
}

impl<C: Clock, S: TickScheduler> CountdownEngine<C, S> {
    pub fn new(
        catalog: Arc<PresetCatalog>,
        settings: EngineSettings,
        clock: C,
        scheduler: S,
        alarm: AlarmSignaler,
        reporter: watch::Sender<TimerSnapshot>,
    ) -> Self {
        Self {
            state: TimerState::new(),
            catalog,
            settings,
            clock,
            scheduler,
            alarm,
            reporter,
            revision: 0,
            next_task_id: 0,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn alarm(&self) -> &AlarmSignaler {
        &self.alarm
    }

    /// Replace the timer with a fresh one for the given preset
    pub fn select_preset(&mut self, id: PresetId) -> Result<TimerSnapshot, EngineError> {
        let preset = self
            .catalog
            .get(id)
            .cloned()
            .ok_or(EngineError::UnknownPreset(id))?;

        self.cancel_scheduled_task();
        self.state = TimerState::ready(id, &preset);

        info!("Preset {} selected: {} ({}s)", id, preset.label, preset.seconds);
        Ok(self.report())
    }

    /// Begin or resume the countdown; a no-op without a preset, while
    /// running, or once the countdown has completed
    pub fn start(&mut self) -> TimerSnapshot {
        if !self.state.can_start() {
            debug!(
                "Start ignored: has_preset={}, running={}, remaining={}s",
                self.state.has_preset(),
                self.state.is_running,
                self.state.remaining_seconds
            );
            return self.snapshot();
        }

        let now = self.clock.now();
        let Some(deadline) = now.checked_add(Duration::from_secs(self.state.remaining_seconds)) else {
            warn!(
                "Start ignored: {}s does not fit the monotonic clock",
                self.state.remaining_seconds
            );
            return self.snapshot();
        };

        // Acquire audio output now so the alarm plays without setup delay
        self.alarm.prepare();

        self.state.deadline = Some(deadline);
        self.state.is_running = true;
        self.state.status = TimerStatus::Running;
        let snapshot = self.report();

        let task_id = self.allocate_task_id();
        let task = self.scheduler.schedule(task_id, self.settings.tick_interval);
        self.state.scheduled_task = Some(task);

        info!(
            "Countdown started with {}s remaining (correction task {})",
            self.state.remaining_seconds, task_id
        );
        snapshot
    }

    /// Halt the countdown, keeping the remaining time for a later start
    pub fn stop(&mut self) -> TimerSnapshot {
        if !self.state.is_running {
            debug!("Stop ignored: countdown is not running");
            return self.snapshot();
        }

        let deadline = self.state.deadline;
        self.cancel_scheduled_task();
        self.correct_remaining(deadline);
        // Only an uninterrupted countdown completes; a stop in the last
        // half second keeps the final second
        self.state.remaining_seconds = self.state.remaining_seconds.max(1);

        self.state.status = TimerStatus::Stopped;
        info!("Countdown stopped with {}s remaining", self.state.remaining_seconds);
        self.report()
    }

    /// Restore the full preset duration
    pub fn reset(&mut self) -> TimerSnapshot {
        self.cancel_scheduled_task();
        self.state.remaining_seconds = self.state.total_seconds;
        self.state.status = if self.state.has_preset() {
            TimerStatus::Reset
        } else {
            TimerStatus::Idle
        };

        info!("Countdown reset to {}s", self.state.total_seconds);
        self.report()
    }

    /// Handle one correction tick; ticks from a cancelled task are discarded
    pub fn on_tick(&mut self, task_id: TaskId) -> Option<TimerSnapshot> {
        let armed = self.state.scheduled_task.as_ref().map(|task| task.id());
        if armed != Some(task_id) {
            debug!("Discarding tick from stale correction task {}", task_id);
            return None;
        }

        self.correct_remaining(self.state.deadline);
        if self.state.remaining_seconds == 0 {
            return Some(self.complete());
        }

        Some(self.report())
    }

    /// Snapshot of the current state without publishing it
    pub fn snapshot(&self) -> TimerSnapshot {
        let state = &self.state;
        let preset = state.selected_preset.and_then(|id| self.catalog.get(id));
        let ends_at = state.deadline.and_then(|deadline| {
            let left = deadline.saturating_duration_since(self.clock.now());
            chrono::Duration::from_std(left).ok().map(|left| Utc::now() + left)
        });

        TimerSnapshot {
            revision: self.revision,
            remaining: format_time(state.remaining_seconds),
            remaining_seconds: state.remaining_seconds,
            total_seconds: state.total_seconds,
            is_running: state.is_running,
            has_preset: state.has_preset(),
            selected_preset: state.selected_preset,
            status_label: state.status.label(preset, self.settings.stop_style),
            controls: Controls {
                start_enabled: state.can_start(),
                stop_enabled: state.is_running,
                reset_enabled: state.has_preset(),
            },
            ends_at,
        }
    }

    /// Cancel whatever is still armed, used when the engine task exits
    pub fn shutdown(&mut self) {
        self.cancel_scheduled_task();
    }

    fn complete(&mut self) -> TimerSnapshot {
        self.cancel_scheduled_task();
        self.state.remaining_seconds = 0;
        self.state.status = TimerStatus::Done;
        let snapshot = self.report();

        info!("Countdown finished, sounding alarm");
        self.alarm.trigger();
        snapshot
    }

    /// Recompute remaining time from the deadline; never increases it
    fn correct_remaining(&mut self, deadline: Option<tokio::time::Instant>) {
        let Some(deadline) = deadline else {
            return;
        };

        let left = deadline.saturating_duration_since(self.clock.now());
        let rounded = ((left.as_millis() + 500) / 1000) as u64;
        self.state.remaining_seconds = rounded.min(self.state.remaining_seconds);
    }

    fn cancel_scheduled_task(&mut self) {
        if let Some(task) = self.state.halt() {
            task.cancel();
        }
    }

    fn allocate_task_id(&mut self) -> TaskId {
        self.next_task_id += 1;
        TaskId(self.next_task_id)
    }

    fn report(&mut self) -> TimerSnapshot {
        self.revision += 1;
        let snapshot = self.snapshot();
        self.reporter.send_replace(snapshot.clone());
        snapshot
    }
}
