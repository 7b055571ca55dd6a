//! Reverb effect
//!
//! Mono Freeverb:
//! - 8 parallel comb filters with a damped feedback path
//! - 4 series allpass filters for diffusion
//!
//! Delay lengths are tuned at 44.1 kHz and scaled to the working rate.

use crate::dsp::effect::EffectUnit;
use crate::error::{Result, SpeechFxError};
use crate::impl_effect_common;

// ============================================================================
// Freeverb Constants
// ============================================================================

/// Reference sample rate for Freeverb delays
const REFERENCE_SAMPLE_RATE: f64 = 44100.0;

/// Comb filter delays at 44100 Hz (8 filters)
const COMB_DELAYS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Allpass filter delays at 44100 Hz (4 filters)
const ALLPASS_DELAYS: [usize; 4] = [556, 441, 341, 225];

/// Fixed gain for allpass filters
const ALLPASS_GAIN: f32 = 0.5;

/// Input attenuation ahead of the comb bank
const FIXED_GAIN: f32 = 0.015;

/// Compensates for `FIXED_GAIN` on the wet path
const WET_SCALE: f32 = 3.0;

/// Scale factor for room size parameter to feedback
const ROOM_SCALE: f32 = 0.28;

/// Offset for room size parameter to feedback
const ROOM_OFFSET: f32 = 0.7;

/// Scale factor for damping parameter
const DAMP_SCALE: f32 = 0.4;

/// Default wet signal level
const DEFAULT_WET_LEVEL: f32 = 0.3;

// ============================================================================
// Filter Components
// ============================================================================

/// Low-pass feedback comb filter
#[derive(Debug, Clone)]
struct CombFilter {
    buffer: Vec<f32>,
    index: usize,
    filter_state: f32,
}

impl CombFilter {
    fn new(delay: usize) -> Self {
        Self {
            buffer: vec![0.0; delay.max(1)],
            index: 0,
            filter_state: 0.0,
        }
    }

    /// y[n] = x[n - d] with lowpassed feedback written back into the line
    #[inline]
    fn process(&mut self, input: f32, feedback: f32, damp: f32) -> f32 {
        let output = self.buffer[self.index];
        self.filter_state = output * (1.0 - damp) + self.filter_state * damp;
        self.buffer[self.index] = input + self.filter_state * feedback;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.filter_state = 0.0;
        self.index = 0;
    }
}

/// Schroeder allpass for diffusion
#[derive(Debug, Clone)]
struct AllpassFilter {
    buffer: Vec<f32>,
    index: usize,
}

impl AllpassFilter {
    fn new(delay: usize) -> Self {
        Self {
            buffer: vec![0.0; delay.max(1)],
            index: 0,
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.index];
        let output = delayed - input;
        self.buffer[self.index] = input + delayed * ALLPASS_GAIN;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
    }
}

// ============================================================================
// Main Reverb Effect
// ============================================================================

/// Mono Freeverb room reverb
#[derive(Debug, Clone)]
pub struct Reverb {
    /// Room size: 0 (tiny) to 1 (huge hall)
    room_size: f32,
    /// Damping: 0 (bright) to 1 (dark)
    damping: f32,
    /// Wet signal level: 0 to 1
    wet_level: f32,
    /// Dry signal level: 0 to 1
    dry_level: f32,
    combs: Vec<CombFilter>,
    allpasses: Vec<AllpassFilter>,
}

impl Reverb {
    /// Create a reverb with the given room size and damping (both 0..=1)
    pub fn new(room_size: f64, damping: f64) -> Result<Self> {
        for (param, value) in [("room_size", room_size), ("damping", damping)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SpeechFxError::invalid_parameter(param, value, "0.0 to 1.0"));
            }
        }
        Ok(Self {
            room_size: room_size as f32,
            damping: damping as f32,
            wet_level: DEFAULT_WET_LEVEL,
            dry_level: 1.0,
            combs: Vec::new(),
            allpasses: Vec::new(),
        })
    }

    pub fn room_size(&self) -> f32 {
        self.room_size
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Set wet signal level (clamped to 0-1)
    pub fn set_wet_level(&mut self, level: f32) {
        self.wet_level = level.clamp(0.0, 1.0);
    }

    /// Set dry signal level (clamped to 0-1)
    pub fn set_dry_level(&mut self, level: f32) {
        self.dry_level = level.clamp(0.0, 1.0);
    }

    /// Comb feedback derived from room size
    fn feedback(&self) -> f32 {
        self.room_size * ROOM_SCALE + ROOM_OFFSET
    }

    fn scaled(delay: usize, scale: f64) -> usize {
        ((delay as f64 * scale) as usize).max(1)
    }
}

impl EffectUnit for Reverb {
    impl_effect_common!("reverb", "Reverb");

    fn process(&mut self, samples: &mut [f32]) -> Result<()> {
        if self.combs.is_empty() {
            return Err(SpeechFxError::ProcessingFailure {
                effect: self.effect_type().to_string(),
                reason: "process called before prepare".to_string(),
            });
        }

        let feedback = self.feedback();
        let damp = self.damping * DAMP_SCALE;
        let wet = self.wet_level * WET_SCALE;

        for sample in samples.iter_mut() {
            let input = *sample * FIXED_GAIN;

            // Combs in parallel
            let mut out = 0.0;
            for comb in &mut self.combs {
                out += comb.process(input, feedback, damp);
            }

            // Allpasses in series
            for allpass in &mut self.allpasses {
                out = allpass.process(out);
            }

            *sample = *sample * self.dry_level + out * wet;
        }
        Ok(())
    }

    fn prepare(&mut self, sample_rate: u32) {
        let scale = sample_rate as f64 / REFERENCE_SAMPLE_RATE;
        self.combs = COMB_DELAYS
            .iter()
            .map(|&d| CombFilter::new(Self::scaled(d, scale)))
            .collect();
        self.allpasses = ALLPASS_DELAYS
            .iter()
            .map(|&d| AllpassFilter::new(Self::scaled(d, scale)))
            .collect();
    }

    fn reset(&mut self) {
        self.combs.iter_mut().for_each(CombFilter::clear);
        self.allpasses.iter_mut().for_each(AllpassFilter::clear);
    }
}
