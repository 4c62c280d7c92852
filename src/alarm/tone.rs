//! Alarm tone synthesis
//!
//! A tone is a waveform whose frequency follows a plan and whose amplitude
//! follows keyframed automation, rendered into a finite mono buffer. Because
//! the buffer is finite, playback ends on its own after the tone's duration.

use std::time::Duration;
use serde::Serialize;

/// Built-in alarm designs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ToneProfile {
    /// Square wave stepping through four pitches over 1.6s
    #[default]
    SquareSteps,
    /// Triangle wave gliding down an octave over 1.2s
    TriangleSweep,
}

impl ToneProfile {
    pub fn sequence(self) -> ToneSequence {
        match self {
            ToneProfile::SquareSteps => ToneSequence {
                waveform: Waveform::Square,
                frequency: FrequencyPlan::Steps(vec![
                    (0.0, 880.0),
                    (0.4, 660.0),
                    (0.8, 990.0),
                    (1.2, 440.0),
                ]),
                envelope: vec![
                    Keyframe::new(0.0, 0.0001, Curve::Step),
                    Keyframe::new(0.05, 0.5, Curve::Exponential),
                    Keyframe::new(0.6, 0.35, Curve::Exponential),
                    Keyframe::new(0.9, 0.35, Curve::Step),
                    Keyframe::new(1.6, 0.0001, Curve::Exponential),
                ],
                duration: Duration::from_millis(1600),
            },
            ToneProfile::TriangleSweep => ToneSequence {
                waveform: Waveform::Triangle,
                frequency: FrequencyPlan::Sweep {
                    from: 880.0,
                    to: 440.0,
                },
                envelope: vec![
                    Keyframe::new(0.0, 0.0001, Curve::Step),
                    Keyframe::new(0.04, 0.4, Curve::Exponential),
                    Keyframe::new(0.8, 0.4, Curve::Step),
                    Keyframe::new(1.2, 0.0001, Curve::Exponential),
                ],
                duration: Duration::from_millis(1200),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Triangle,
}

impl Waveform {
    /// Value at `phase` in cycles, within [-1, 1]
    fn sample(self, phase: f32) -> f32 {
        let phase = phase.fract();
        match self {
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

/// How pitch evolves over the tone
#[derive(Debug, Clone, PartialEq)]
pub enum FrequencyPlan {
    /// `(start_secs, hz)` pairs, each held until the next
    Steps(Vec<(f32, f32)>),
    /// Exponential glide across the whole duration
    Sweep { from: f32, to: f32 },
}

/// How a keyframe is approached from the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    /// Hold the previous value, jump at the keyframe
    Step,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub at: f32,
    pub value: f32,
    pub curve: Curve,
}

impl Keyframe {
    pub fn new(at: f32, value: f32, curve: Curve) -> Self {
        Self { at, value, curve }
    }
}

/// A fully described alarm tone
#[derive(Debug, Clone, PartialEq)]
pub struct ToneSequence {
    pub waveform: Waveform,
    pub frequency: FrequencyPlan,
    /// Gain keyframes sorted by time
    pub envelope: Vec<Keyframe>,
    pub duration: Duration,
}

impl ToneSequence {
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn frequency_at(&self, t: f32) -> f32 {
        match &self.frequency {
            FrequencyPlan::Steps(steps) => steps
                .iter()
                .take_while(|(start, _)| *start <= t)
                .last()
                .or_else(|| steps.first())
                .map(|(_, hz)| *hz)
                .unwrap_or(0.0),
            FrequencyPlan::Sweep { from, to } => {
                let progress = (t / self.duration.as_secs_f32()).clamp(0.0, 1.0);
                from * (to / from).powf(progress)
            }
        }
    }

    pub fn gain_at(&self, t: f32) -> f32 {
        let Some(first) = self.envelope.first() else {
            return 1.0;
        };
        if t <= first.at {
            return first.value;
        }

        for pair in self.envelope.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if t >= to.at {
                continue;
            }
            let span = to.at - from.at;
            let progress = if span > 0.0 { (t - from.at) / span } else { 1.0 };
            return match to.curve {
                Curve::Step => from.value,
                Curve::Exponential => from.value * (to.value / from.value).powf(progress),
            };
        }

        self.envelope.last().map_or(1.0, |last| last.value)
    }

    /// Render to mono samples; the buffer is exactly `duration` long
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let total = (self.duration.as_secs_f64() * f64::from(sample_rate)).round() as usize;
        let mut samples = Vec::with_capacity(total);
        let mut phase = 0.0f32;

        for i in 0..total {
            let t = i as f32 / sample_rate as f32;
            samples.push(self.waveform.sample(phase) * self.gain_at(t));
            phase = (phase + self.frequency_at(t) / sample_rate as f32).fract();
        }

        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 44_100;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    #[test]
    fn durations_stay_within_alarm_bounds() {
        for profile in [ToneProfile::SquareSteps, ToneProfile::TriangleSweep] {
            let duration = profile.sequence().duration();
            assert!(duration >= Duration::from_millis(1200), "{:?} too short", profile);
            assert!(duration <= Duration::from_millis(1600), "{:?} too long", profile);
        }
    }

    #[test]
    fn render_is_finite_and_exactly_the_tone_length() {
        let tone = ToneProfile::SquareSteps.sequence();
        let samples = tone.render(RATE);
        assert_eq!(samples.len(), RATE as usize * 16 / 10);
        assert!(samples.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn envelope_rises_sustains_and_decays() {
        let tone = ToneProfile::SquareSteps.sequence();
        assert!(tone.gain_at(0.0) < 0.001);
        assert!((tone.gain_at(0.05) - 0.5).abs() < 1e-4);
        assert!((tone.gain_at(0.75) - 0.35).abs() < 1e-4);
        assert!(tone.gain_at(1.6) < 0.001);

        let samples = tone.render(RATE);
        let head = &samples[..RATE as usize / 100];
        let body = &samples[RATE as usize / 10..RATE as usize / 2];
        let tail = &samples[samples.len() - RATE as usize / 100..];
        assert!(peak(head) < peak(body));
        assert!(peak(tail) < 0.01);
        assert!(peak(body) <= 0.5 + 1e-4);
    }

    #[test]
    fn square_steps_change_pitch_on_schedule() {
        let tone = ToneProfile::SquareSteps.sequence();
        assert_eq!(tone.frequency_at(0.1), 880.0);
        assert_eq!(tone.frequency_at(0.5), 660.0);
        assert_eq!(tone.frequency_at(0.9), 990.0);
        assert_eq!(tone.frequency_at(1.5), 440.0);
    }

    #[test]
    fn triangle_sweep_glides_down_an_octave() {
        let tone = ToneProfile::TriangleSweep.sequence();
        assert!((tone.frequency_at(0.0) - 880.0).abs() < 0.01);
        assert!((tone.frequency_at(0.6) - 622.25).abs() < 0.5);
        assert!((tone.frequency_at(1.2) - 440.0).abs() < 0.01);
    }

    #[test]
    fn waveforms_stay_in_range() {
        for waveform in [Waveform::Square, Waveform::Triangle] {
            for step in 0..100 {
                let v = waveform.sample(step as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&v));
            }
        }
    }
}
