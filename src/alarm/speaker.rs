//! Speaker output through rodio
//!
//! rodio's output stream is not `Send`, so each context owns a dedicated
//! audio thread holding the stream and a sink; the context itself only keeps
//! a command channel. The device is opened and tones are rendered on that
//! thread, so no call made from the engine task waits on the sound card.
//! If the device cannot be opened the thread exits, and the next command
//! fails so the signaler reopens. After idling, the thread pauses the sink
//! to let the device power down, and the context reports itself suspended
//! until resumed.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, RecvTimeoutError},
        Arc,
    },
    thread,
    time::Duration,
};
use rodio::{buffer::SamplesBuffer, OutputStream, Sink, Source};
use tracing::{debug, info, warn};

use super::{AlarmError, AudioBackend, AudioContext, ToneSequence};

const SAMPLE_RATE: u32 = 44_100;

/// Opens the default output device
#[derive(Debug, Clone)]
pub struct SpeakerBackend {
    /// Idle time after which the sink is paused
    pub idle_suspend: Duration,
}

impl Default for SpeakerBackend {
    fn default() -> Self {
        Self {
            idle_suspend: Duration::from_secs(30),
        }
    }
}

enum SpeakerCommand {
    Play(ToneSequence),
    Resume,
}

struct SpeakerContext {
    commands: mpsc::Sender<SpeakerCommand>,
    suspended: Arc<AtomicBool>,
}

impl AudioBackend for SpeakerBackend {
    fn name(&self) -> &'static str {
        "speaker"
    }

    fn open(&self) -> Result<Box<dyn AudioContext>, AlarmError> {
        let (commands, receiver) = mpsc::channel();
        let suspended = Arc::new(AtomicBool::new(false));
        let thread_suspended = Arc::clone(&suspended);
        let idle_suspend = self.idle_suspend;

        thread::Builder::new()
            .name("alarm-audio".to_string())
            .spawn(move || audio_thread(receiver, thread_suspended, idle_suspend))
            .map_err(|e| AlarmError::Unavailable(format!("failed to spawn audio thread: {}", e)))?;

        Ok(Box::new(SpeakerContext {
            commands,
            suspended,
        }))
    }
}

impl AudioContext for SpeakerContext {
    fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::Acquire)
    }

    fn resume(&mut self) -> Result<(), AlarmError> {
        self.commands
            .send(SpeakerCommand::Resume)
            .map_err(|_| AlarmError::Resume("audio thread is gone".to_string()))
    }

    fn play(&mut self, tone: &ToneSequence) -> Result<(), AlarmError> {
        self.commands
            .send(SpeakerCommand::Play(tone.clone()))
            .map_err(|_| AlarmError::Playback("audio thread is gone".to_string()))
    }
}

fn audio_thread(
    commands: mpsc::Receiver<SpeakerCommand>,
    suspended: Arc<AtomicBool>,
    idle_suspend: Duration,
) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(output) => output,
        Err(e) => {
            warn!("Speaker output unavailable: {}", e);
            return;
        }
    };
    let sink = match Sink::try_new(&handle) {
        Ok(sink) => sink,
        Err(e) => {
            warn!("Speaker sink unavailable: {}", e);
            return;
        }
    };
    info!("Speaker output opened");

    loop {
        match commands.recv_timeout(idle_suspend) {
            Ok(SpeakerCommand::Play(tone)) => {
                if sink.is_paused() {
                    sink.play();
                    suspended.store(false, Ordering::Release);
                }
                let samples = tone.render(SAMPLE_RATE);
                // Bounded twice: the buffer is finite and the source is cut at `duration`
                sink.append(
                    SamplesBuffer::new(1, SAMPLE_RATE, samples).take_duration(tone.duration()),
                );
            }
            Ok(SpeakerCommand::Resume) => {
                sink.play();
                suspended.store(false, Ordering::Release);
                debug!("Speaker output resumed");
            }
            Err(RecvTimeoutError::Timeout) => {
                if sink.empty() && !sink.is_paused() {
                    sink.pause();
                    suspended.store(true, Ordering::Release);
                    debug!("Speaker output suspended after {:?} idle", idle_suspend);
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                sink.stop();
                break;
            }
        }
    }

    info!("Speaker output closed");
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn open_returns_without_waiting_for_the_device() {
        let started = Instant::now();

        let context = SpeakerBackend::default().open();

        assert!(context.is_ok());
        assert!(started.elapsed() < Duration::from_millis(100));
    }
}
