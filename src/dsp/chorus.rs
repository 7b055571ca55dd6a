//! Chorus effect
//!
//! A short delay line whose read position is swept by a sine LFO, mixed
//! back with the dry signal.

use crate::dsp::effect::EffectUnit;
use crate::error::{Result, SpeechFxError};
use crate::impl_effect_common;
use std::f32::consts::TAU;

/// Centre of the modulated delay
const BASE_DELAY_MS: f32 = 7.0;

/// LFO sweep either side of the base delay
const DEFAULT_DEPTH_MS: f32 = 3.0;

/// Wet/dry mix (0 = dry, 1 = wet)
const DEFAULT_MIX: f32 = 0.5;

/// LFO-modulated mono chorus
#[derive(Debug, Clone)]
pub struct Chorus {
    /// LFO rate in Hz
    rate_hz: f32,
    depth_ms: f32,
    mix: f32,
    buffer: Vec<f32>,
    write_pos: usize,
    /// LFO phase in radians
    phase: f32,
    sample_rate: u32,
}

impl Chorus {
    /// Create a chorus with the given LFO rate
    pub fn new(rate_hz: f64) -> Result<Self> {
        if !(rate_hz > 0.0 && rate_hz.is_finite()) {
            return Err(SpeechFxError::invalid_parameter(
                "chorus_rate",
                rate_hz,
                "greater than 0 Hz",
            ));
        }
        Ok(Self {
            rate_hz: rate_hz as f32,
            depth_ms: DEFAULT_DEPTH_MS,
            mix: DEFAULT_MIX,
            buffer: Vec::new(),
            write_pos: 0,
            phase: 0.0,
            sample_rate: 0,
        })
    }

    pub fn rate_hz(&self) -> f32 {
        self.rate_hz
    }

    /// Set wet/dry mix (clamped to 0-1)
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    /// Set LFO depth in milliseconds (clamped so the sweep never goes negative)
    pub fn set_depth_ms(&mut self, depth_ms: f32) {
        self.depth_ms = depth_ms.clamp(0.0, BASE_DELAY_MS - 1.0);
    }

    /// Read the delay line `delay` samples back, interpolating linearly
    #[inline]
    fn read_interpolated(&self, delay: f32) -> f32 {
        let len = self.buffer.len();
        let whole = delay as usize;
        let frac = delay - whole as f32;

        let newer = self.buffer[(self.write_pos + len - whole) % len];
        let older = self.buffer[(self.write_pos + len - whole - 1) % len];
        newer + (older - newer) * frac
    }
}

impl EffectUnit for Chorus {
    impl_effect_common!("chorus", "Chorus");

    fn process(&mut self, samples: &mut [f32]) -> Result<()> {
        if self.buffer.is_empty() {
            return Err(SpeechFxError::ProcessingFailure {
                effect: self.effect_type().to_string(),
                reason: "process called before prepare".to_string(),
            });
        }

        let rate = self.sample_rate as f32;
        let phase_inc = TAU * self.rate_hz / rate;

        for sample in samples.iter_mut() {
            let input = *sample;
            self.buffer[self.write_pos] = input;

            let delay_ms = BASE_DELAY_MS + self.phase.sin() * self.depth_ms;
            let delay = (delay_ms / 1000.0 * rate).max(1.0);
            let wet = self.read_interpolated(delay);

            self.write_pos = (self.write_pos + 1) % self.buffer.len();
            self.phase += phase_inc;
            if self.phase >= TAU {
                self.phase -= TAU;
            }

            *sample = input + (wet - input) * self.mix;
        }
        Ok(())
    }

    fn prepare(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        let max_delay_ms = BASE_DELAY_MS * 2.0;
        let len = (max_delay_ms / 1000.0 * sample_rate as f32) as usize + 2;
        self.buffer = vec![0.0; len];
        self.write_pos = 0;
        self.phase = 0.0;
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
        self.phase = 0.0;
    }
}
