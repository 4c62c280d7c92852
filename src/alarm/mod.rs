//! Alarm module
//!
//! Synthesizes the completion tone and plays it through a lazily opened
//! audio output. Speaker output needs the `audio` cargo feature.

pub mod backend;
pub mod signaler;
#[cfg(feature = "audio")]
pub mod speaker;
pub mod tone;

// Re-export main types
pub use backend::{
    backend_for, AlarmError, AlarmOutput, AudioBackend, AudioContext, BellBackend,
    NoAudioBackend,
};
pub use signaler::AlarmSignaler;
pub use tone::{ToneProfile, ToneSequence};
