//! Pitch Shift Effect
//!
//! Delay-line pitch shifter. Two read taps sweep across a short window at a
//! rate set by the pitch ratio, half a window apart, and are crossfaded with
//! triangular gains that always sum to one. Duration is preserved; only the
//! perceived pitch moves.

use crate::dsp::descriptor::MAX_PITCH_SEMITONES;
use crate::dsp::effect::EffectUnit;
use crate::error::{Result, SpeechFxError};
use crate::impl_effect_common;

/// Grain window length in milliseconds
const WINDOW_MS: f64 = 64.0;

/// Pitch ratio for a shift in semitones (`2^(n/12)`)
#[inline]
pub fn semitones_to_ratio(semitones: i32) -> f64 {
    2.0_f64.powf(semitones as f64 / 12.0)
}

/// Triangular crossfade gain for a tap at `phase` in [0, 1)
#[inline]
fn tap_gain(phase: f64) -> f32 {
    (1.0 - (2.0 * phase - 1.0).abs()) as f32
}

/// Duration-preserving pitch shifter
#[derive(Debug, Clone)]
pub struct PitchShift {
    semitones: i32,
    ratio: f64,
    /// Window length in samples
    window: usize,
    buffer: Vec<f32>,
    write_pos: usize,
    /// Sweep position of the first tap, in [0, 1)
    phase: f64,
}

impl PitchShift {
    /// Create a pitch shifter for a whole number of semitones
    pub fn new(semitones: i32) -> Result<Self> {
        if semitones.unsigned_abs() > MAX_PITCH_SEMITONES.unsigned_abs() {
            return Err(SpeechFxError::invalid_parameter(
                "pitch_shift_semitones",
                semitones,
                "-24 to 24",
            ));
        }
        Ok(Self {
            semitones,
            ratio: semitones_to_ratio(semitones),
            window: 0,
            buffer: Vec::new(),
            write_pos: 0,
            phase: 0.0,
        })
    }

    pub fn semitones(&self) -> i32 {
        self.semitones
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Read `delay` samples behind the write head with linear interpolation
    #[inline]
    fn read_delayed(&self, delay: f64) -> f32 {
        let len = self.buffer.len();
        let whole = delay as usize;
        let frac = (delay - whole as f64) as f32;

        let newer = self.buffer[(self.write_pos + len - whole) % len];
        let older = self.buffer[(self.write_pos + len - whole - 1) % len];
        newer + (older - newer) * frac
    }
}

impl EffectUnit for PitchShift {
    impl_effect_common!("pitch_shift", "Pitch Shift");

    fn process(&mut self, samples: &mut [f32]) -> Result<()> {
        if self.semitones == 0 {
            return Ok(());
        }
        if self.buffer.is_empty() {
            return Err(SpeechFxError::ProcessingFailure {
                effect: self.effect_type().to_string(),
                reason: "process called before prepare".to_string(),
            });
        }

        let window = self.window as f64;
        // Delay shrinks by (ratio - 1) samples per sample when shifting up
        let step = (1.0 - self.ratio) / window;

        for sample in samples.iter_mut() {
            self.buffer[self.write_pos] = *sample;

            let phase_a = self.phase;
            let phase_b = (self.phase + 0.5).fract();
            let out = self.read_delayed(phase_a * window) * tap_gain(phase_a)
                + self.read_delayed(phase_b * window) * tap_gain(phase_b);

            self.write_pos = (self.write_pos + 1) % self.buffer.len();
            self.phase = (self.phase + step).rem_euclid(1.0);

            *sample = out;
        }
        Ok(())
    }

    fn prepare(&mut self, sample_rate: u32) {
        self.window = ((WINDOW_MS / 1000.0 * sample_rate as f64) as usize).max(4);
        self.buffer = vec![0.0; self.window + 2];
        self.write_pos = 0;
        self.phase = 0.0;
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
        self.phase = 0.0;
    }
}
