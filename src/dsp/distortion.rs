//! Distortion Effect
//!
//! Input gain followed by a `tanh` waveshaper. The shaper is bounded, so
//! output never exceeds unity no matter how hard it is driven.

use crate::dsp::effect::EffectUnit;
use crate::engine::db_to_linear;
use crate::error::{Result, SpeechFxError};
use crate::impl_effect_common;

/// Minimum mix (0.0 = fully dry)
const MIN_MIX: f32 = 0.0;

/// Maximum mix (1.0 = fully wet)
const MAX_MIX: f32 = 1.0;

/// Soft-clipping distortion
///
/// `y = tanh(x * gain)` where gain is the drive in dB converted to linear.
/// At 0 dB the shaper only rounds off peaks near full scale.
#[derive(Debug, Clone)]
pub struct Distortion {
    gain_db: f32,
    /// Cached linear drive
    gain_linear: f32,
    mix: f32,
}

impl Distortion {
    /// Create a distortion with the given drive in dB (must be >= 0)
    pub fn new(gain_db: f64) -> Result<Self> {
        if !(gain_db >= 0.0 && gain_db.is_finite()) {
            return Err(SpeechFxError::invalid_parameter(
                "distortion_gain_db",
                gain_db,
                "0 dB or more",
            ));
        }
        let gain_db = gain_db as f32;
        Ok(Self {
            gain_db,
            gain_linear: db_to_linear(gain_db),
            mix: MAX_MIX,
        })
    }

    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Set the dry/wet mix, clamped to valid range
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(MIN_MIX, MAX_MIX);
    }

    #[inline]
    fn waveshape(&self, x: f32) -> f32 {
        (x * self.gain_linear).tanh()
    }
}

impl EffectUnit for Distortion {
    impl_effect_common!("distortion", "Distortion");

    fn process(&mut self, samples: &mut [f32]) -> Result<()> {
        let wet_mix = self.mix;
        let dry_mix = 1.0 - wet_mix;
        for sample in samples.iter_mut() {
            let dry = *sample;
            *sample = dry * dry_mix + self.waveshape(dry) * wet_mix;
        }
        Ok(())
    }

    // Stateless
    fn prepare(&mut self, _sample_rate: u32) {}

    fn reset(&mut self) {}
}
