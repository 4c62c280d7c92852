//! Countdown engine module
//!
//! The engine owns the timer state, derives remaining time from an absolute
//! deadline and publishes a snapshot after every transition. It is driven by
//! a single task, so none of its operations ever run concurrently.

pub mod clock;
pub mod command;
pub mod countdown;
pub mod error;
pub mod handle;
pub mod scheduler;

// Re-export main types
pub use clock::{Clock, TokioClock};
#[cfg(test)]
pub use clock::ManualClock;
pub use command::EngineCommand;
pub use countdown::{CountdownEngine, EngineSettings};
pub use error::EngineError;
pub use handle::TimerHandle;
pub use scheduler::{ScheduledTask, TaskId, TickScheduler, TokioTickScheduler};
