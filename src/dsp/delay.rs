//! Delay Effect
//!
//! Mono feedback delay with a low-pass filter in the feedback path.

use crate::dsp::effect::EffectUnit;
use crate::error::{Result, SpeechFxError};
use crate::impl_effect_common;
use std::f32::consts::PI;

/// Default feedback amount (kept well under 1.0 so the tail decays)
const DEFAULT_FEEDBACK: f32 = 0.35;

/// Default wet signal level
const DEFAULT_WET_LEVEL: f32 = 0.5;

/// Low-pass frequency on the feedback path
const FEEDBACK_FILTER_HZ: f32 = 6000.0;

/// Mono feedback delay
#[derive(Debug, Clone)]
pub struct Delay {
    /// Delay time in seconds
    delay_seconds: f32,
    /// Feedback amount (0-0.95)
    feedback: f32,
    /// Wet signal level (0-1)
    wet_level: f32,
    /// Dry signal level (0-1)
    dry_level: f32,
    /// Circular buffer
    buffer: Vec<f32>,
    /// Current write position in circular buffer
    write_pos: usize,
    /// Sample rate for calculations
    sample_rate: u32,
    /// One-pole lowpass filter state
    filter_state: f32,
}

impl Delay {
    /// Create a new delay effect
    ///
    /// # Arguments
    /// * `delay_seconds` - Delay time, must be positive and finite
    pub fn new(delay_seconds: f64) -> Result<Self> {
        if !(delay_seconds > 0.0 && delay_seconds.is_finite()) {
            return Err(SpeechFxError::invalid_parameter(
                "delay_seconds",
                delay_seconds,
                "greater than 0",
            ));
        }
        Ok(Self {
            delay_seconds: delay_seconds as f32,
            feedback: DEFAULT_FEEDBACK,
            wet_level: DEFAULT_WET_LEVEL,
            dry_level: 1.0,
            buffer: Vec::new(),
            write_pos: 0,
            sample_rate: 0,
            filter_state: 0.0,
        })
    }

    /// Set feedback amount (clamped to 0-0.95)
    pub fn set_feedback(&mut self, fb: f32) {
        self.feedback = fb.clamp(0.0, 0.95);
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Set wet signal level (clamped to 0-1)
    pub fn set_wet_level(&mut self, level: f32) {
        self.wet_level = level.clamp(0.0, 1.0);
    }

    /// Set dry signal level (clamped to 0-1)
    pub fn set_dry_level(&mut self, level: f32) {
        self.dry_level = level.clamp(0.0, 1.0);
    }

    /// Calculate delay in samples
    fn delay_samples(&self) -> usize {
        ((self.delay_seconds * self.sample_rate as f32) as usize).max(1)
    }

    /// Calculate one-pole lowpass filter coefficient
    fn calc_filter_coeff(&self) -> f32 {
        // coeff = 1 - exp(-2 * PI * fc / fs), fc capped below Nyquist
        let fs = self.sample_rate.max(1) as f32;
        let fc = FEEDBACK_FILTER_HZ.min(fs * 0.45);
        1.0 - (-2.0 * PI * fc / fs).exp()
    }
}

impl EffectUnit for Delay {
    impl_effect_common!("delay", "Delay");

    fn process(&mut self, samples: &mut [f32]) -> Result<()> {
        if self.buffer.is_empty() {
            return Err(SpeechFxError::ProcessingFailure {
                effect: self.effect_type().to_string(),
                reason: "process called before prepare".to_string(),
            });
        }

        let delay_samples = self.delay_samples();
        let filter_coeff = self.calc_filter_coeff();
        let size = self.buffer.len();

        for sample in samples.iter_mut() {
            let input = *sample;

            // Buffer holds exactly delay_samples + 1 slots
            let read_pos = (self.write_pos + size - delay_samples) % size;
            let delayed = self.buffer[read_pos];

            self.filter_state += filter_coeff * (delayed * self.feedback - self.filter_state);
            self.buffer[self.write_pos] = input + self.filter_state;

            *sample = input * self.dry_level + delayed * self.wet_level;
            self.write_pos = (self.write_pos + 1) % size;
        }
        Ok(())
    }

    fn prepare(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        self.buffer = vec![0.0; self.delay_samples() + 1];
        self.write_pos = 0;
        self.filter_state = 0.0;
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
        self.filter_state = 0.0;
    }
}
