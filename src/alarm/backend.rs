//! Audio output backends

use std::io::Write;
use thiserror::Error;
use tracing::debug;

use super::ToneSequence;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlarmError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error("audio resume failed: {0}")]
    Resume(String),
    #[error("alarm playback failed: {0}")]
    Playback(String),
}

/// Where alarms are sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AlarmOutput {
    /// Speaker when compiled with the `audio` feature, otherwise the terminal bell
    #[default]
    Auto,
    /// Synthesized tone on the default output device
    Speaker,
    /// ASCII BEL on stderr
    Bell,
    /// Silent
    None,
}

/// An acquired audio output
pub trait AudioContext: Send {
    /// True while the output idles in a power-saving state
    fn is_suspended(&self) -> bool;

    fn resume(&mut self) -> Result<(), AlarmError>;

    /// Start playing `tone`; returns without waiting for it to finish
    fn play(&mut self, tone: &ToneSequence) -> Result<(), AlarmError>;
}

/// Factory for audio contexts; `open` may fail in restricted environments
pub trait AudioBackend: Send {
    fn name(&self) -> &'static str;

    /// Whether this backend can ever produce a context
    fn is_available(&self) -> bool {
        true
    }

    fn open(&self) -> Result<Box<dyn AudioContext>, AlarmError>;
}

/// Pick a backend for the configured output
pub fn backend_for(output: AlarmOutput) -> Box<dyn AudioBackend> {
    match output {
        AlarmOutput::Auto => default_backend(),
        AlarmOutput::Speaker => speaker_backend(),
        AlarmOutput::Bell => Box::new(BellBackend),
        AlarmOutput::None => Box::new(NoAudioBackend),
    }
}

#[cfg(feature = "audio")]
fn default_backend() -> Box<dyn AudioBackend> {
    Box::new(super::speaker::SpeakerBackend::default())
}

#[cfg(not(feature = "audio"))]
fn default_backend() -> Box<dyn AudioBackend> {
    Box::new(BellBackend)
}

#[cfg(feature = "audio")]
fn speaker_backend() -> Box<dyn AudioBackend> {
    Box::new(super::speaker::SpeakerBackend::default())
}

#[cfg(not(feature = "audio"))]
fn speaker_backend() -> Box<dyn AudioBackend> {
    tracing::warn!("Speaker output requested but built without the `audio` feature");
    Box::new(NoAudioBackend)
}

/// Backend with no output at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAudioBackend;

impl AudioBackend for NoAudioBackend {
    fn name(&self) -> &'static str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn open(&self) -> Result<Box<dyn AudioContext>, AlarmError> {
        Err(AlarmError::Unavailable("audio output disabled".to_string()))
    }
}

/// Rings the terminal bell once per alarm
#[derive(Debug, Clone, Copy, Default)]
pub struct BellBackend;

impl AudioBackend for BellBackend {
    fn name(&self) -> &'static str {
        "bell"
    }

    fn open(&self) -> Result<Box<dyn AudioContext>, AlarmError> {
        Ok(Box::new(BellContext))
    }
}

struct BellContext;

impl AudioContext for BellContext {
    fn is_suspended(&self) -> bool {
        false
    }

    fn resume(&mut self) -> Result<(), AlarmError> {
        Ok(())
    }

    fn play(&mut self, tone: &ToneSequence) -> Result<(), AlarmError> {
        debug!("Ringing terminal bell for {:?} alarm", tone.waveform);
        let mut stderr = std::io::stderr().lock();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|e| AlarmError::Playback(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_backend_is_feature_detected_absent() {
        let backend = backend_for(AlarmOutput::None);
        assert!(!backend.is_available());
        assert!(matches!(backend.open(), Err(AlarmError::Unavailable(_))));
    }

    #[test]
    fn bell_backend_always_opens() {
        let backend = backend_for(AlarmOutput::Bell);
        assert_eq!(backend.name(), "bell");
        let context = backend.open().expect("bell context");
        assert!(!context.is_suspended());
    }
}
