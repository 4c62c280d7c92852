//! Alarm signaler with lazily acquired audio output

use tracing::{debug, error, info, warn};

use super::{AudioBackend, AudioContext, NoAudioBackend, ToneProfile};

/// Sounds the completion alarm
///
/// The audio context is opened on first demand and reused afterwards. Any
/// failure to open, resume or play is logged and swallowed: the countdown
/// must keep working with no audio at all.
pub struct AlarmSignaler {
    backend: Box<dyn AudioBackend>,
    context: Option<Box<dyn AudioContext>>,
    tone: ToneProfile,
    triggers: u64,
}

impl AlarmSignaler {
    pub fn new(backend: Box<dyn AudioBackend>, tone: ToneProfile) -> Self {
        Self {
            backend,
            context: None,
            tone,
            triggers: 0,
        }
    }

    /// Signaler that never produces sound
    pub fn disabled() -> Self {
        Self::new(Box::new(NoAudioBackend), ToneProfile::default())
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Number of alarms requested so far, sounded or not
    pub fn trigger_count(&self) -> u64 {
        self.triggers
    }

    /// Acquire (or wake) the audio context ahead of time
    pub fn prepare(&mut self) {
        if self.ensure_context().is_some() {
            debug!("Audio output ready on {}", self.backend.name());
        }
    }

    /// Play the alarm tone; returns as soon as playback is scheduled
    pub fn trigger(&mut self) {
        self.triggers += 1;
        let tone = self.tone.sequence();

        let Some(context) = self.ensure_context() else {
            debug!("No audio output available, alarm skipped");
            return;
        };

        match context.play(&tone) {
            Ok(()) => info!("Alarm playing for {:?}", tone.duration()),
            Err(e) => {
                error!("Alarm failed: {}", e);
                // Reopen on the next trigger rather than reuse a broken output
                self.context = None;
            }
        }
    }

    fn ensure_context(&mut self) -> Option<&mut Box<dyn AudioContext>> {
        if !self.backend.is_available() {
            return None;
        }

        if let Some(context) = self.context.as_mut() {
            if context.is_suspended() {
                debug!("Resuming suspended audio output");
                if let Err(e) = context.resume() {
                    warn!("Audio resume failed: {}", e);
                }
            }
        } else {
            match self.backend.open() {
                Ok(context) => {
                    info!("Audio output acquired on {}", self.backend.name());
                    self.context = Some(context);
                }
                Err(e) => {
                    warn!("Audio context unavailable: {}", e);
                    return None;
                }
            }
        }

        self.context.as_mut()
    }
}

impl std::fmt::Debug for AlarmSignaler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmSignaler")
            .field("backend", &self.backend.name())
            .field("acquired", &self.context.is_some())
            .field("tone", &self.tone)
            .field("triggers", &self.triggers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::alarm::{AlarmError, ToneSequence};

    #[derive(Debug, Default)]
    struct Log {
        opens: u32,
        resumes: u32,
        plays: Vec<std::time::Duration>,
    }

    struct FakeBackend {
        log: Arc<Mutex<Log>>,
        fail_open: bool,
        suspended: Arc<Mutex<bool>>,
        fail_resume: bool,
    }

    struct FakeContext {
        log: Arc<Mutex<Log>>,
        suspended: Arc<Mutex<bool>>,
        fail_resume: bool,
    }

    impl AudioBackend for FakeBackend {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn open(&self) -> Result<Box<dyn AudioContext>, AlarmError> {
            self.log.lock().unwrap().opens += 1;
            if self.fail_open {
                return Err(AlarmError::Unavailable("no device".to_string()));
            }
            Ok(Box::new(FakeContext {
                log: Arc::clone(&self.log),
                suspended: Arc::clone(&self.suspended),
                fail_resume: self.fail_resume,
            }))
        }
    }

    impl AudioContext for FakeContext {
        fn is_suspended(&self) -> bool {
            *self.suspended.lock().unwrap()
        }

        fn resume(&mut self) -> Result<(), AlarmError> {
            self.log.lock().unwrap().resumes += 1;
            if self.fail_resume {
                return Err(AlarmError::Resume("still asleep".to_string()));
            }
            *self.suspended.lock().unwrap() = false;
            Ok(())
        }

        fn play(&mut self, tone: &ToneSequence) -> Result<(), AlarmError> {
            self.log.lock().unwrap().plays.push(tone.duration());
            Ok(())
        }
    }

    fn fake(fail_open: bool, fail_resume: bool) -> (AlarmSignaler, Arc<Mutex<Log>>, Arc<Mutex<bool>>) {
        let log = Arc::new(Mutex::new(Log::default()));
        let suspended = Arc::new(Mutex::new(false));
        let backend = FakeBackend {
            log: Arc::clone(&log),
            fail_open,
            suspended: Arc::clone(&suspended),
            fail_resume,
        };
        let signaler = AlarmSignaler::new(Box::new(backend), ToneProfile::SquareSteps);
        (signaler, log, suspended)
    }

    #[test]
    fn context_is_opened_once_and_reused() {
        let (mut signaler, log, _) = fake(false, false);

        signaler.prepare();
        signaler.trigger();
        signaler.trigger();

        let log = log.lock().unwrap();
        assert_eq!(log.opens, 1);
        assert_eq!(log.plays.len(), 2);
        assert_eq!(log.plays[0], std::time::Duration::from_millis(1600));
        assert_eq!(signaler.trigger_count(), 2);
    }

    #[test]
    fn open_failure_is_swallowed_and_retried() {
        let (mut signaler, log, _) = fake(true, false);

        signaler.trigger();
        signaler.trigger();

        let log = log.lock().unwrap();
        assert_eq!(log.opens, 2);
        assert!(log.plays.is_empty());
        assert_eq!(signaler.trigger_count(), 2);
    }

    #[test]
    fn suspended_context_is_resumed_before_playing() {
        let (mut signaler, log, suspended) = fake(false, false);
        signaler.prepare();
        *suspended.lock().unwrap() = true;

        signaler.trigger();

        let log = log.lock().unwrap();
        assert_eq!(log.resumes, 1);
        assert_eq!(log.plays.len(), 1);
        assert!(!*suspended.lock().unwrap());
    }

    #[test]
    fn resume_failure_still_attempts_playback() {
        let (mut signaler, log, suspended) = fake(false, true);
        signaler.prepare();
        *suspended.lock().unwrap() = true;

        signaler.trigger();

        let log = log.lock().unwrap();
        assert_eq!(log.resumes, 1);
        assert_eq!(log.plays.len(), 1);
    }

    #[test]
    fn disabled_signaler_counts_but_stays_silent() {
        let mut signaler = AlarmSignaler::disabled();
        assert!(!signaler.is_available());

        signaler.prepare();
        signaler.trigger();

        assert_eq!(signaler.trigger_count(), 1);
    }
}
