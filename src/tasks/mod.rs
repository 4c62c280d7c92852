//! Background tasks module
//!
//! This module contains the task that owns the countdown engine and the
//! ticker that drives its periodic corrections.

pub mod correction_ticker;
pub mod engine_task;

// Re-export main functions
pub use correction_ticker::correction_ticker;
pub use engine_task::engine_task;
