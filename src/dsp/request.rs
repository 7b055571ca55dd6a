//! Effect requests
//!
//! Two shapes of the same information:
//! - [`EffectRequest`] is the flat wire record. Every field defaults to a
//!   disabled sentinel (zero).
//! - [`EffectConfig`] holds one `Option` per effect. `None` disables the
//!   effect, so a legitimately-zero setting such as 0 dB of distortion can
//!   still be expressed.
//!
//! The chain builder consumes `EffectConfig`; requests are lowered into it
//! with `EffectConfig::from`.

use serde::{Deserialize, Serialize};

use crate::dsp::descriptor::EffectDescriptor;

/// Per-request effect parameters as received from the request layer
///
/// Zero means "off" for every field. Negative values are not treated as
/// off: they enable the effect, so building a chain from the request fails
/// with `InvalidParameter` instead of leaving the effect out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectRequest {
    pub pitch_shift_semitones: i32,
    pub reverb_room_size: f64,
    pub reverb_damping: f64,
    pub delay_seconds: f64,
    pub chorus_rate: f64,
    pub distortion_gain_db: f64,
    pub lowpass_cutoff: f64,
    pub highpass_cutoff: f64,
}

impl EffectRequest {
    /// Request with every effect disabled
    pub fn none() -> Self {
        Self::default()
    }

    /// Parse a request from JSON; missing fields take their disabled default
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Reverb settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverbSettings {
    pub room_size: f64,
    pub damping: f64,
}

/// Explicit per-effect configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectConfig {
    /// Pitch shift in semitones
    pub pitch_shift: Option<i32>,
    pub reverb: Option<ReverbSettings>,
    /// Delay time in seconds
    pub delay: Option<f64>,
    /// Chorus LFO rate in Hz
    pub chorus: Option<f64>,
    /// Distortion drive in dB
    pub distortion: Option<f64>,
    /// Low-pass cutoff in Hz
    pub lowpass: Option<f64>,
    /// High-pass cutoff in Hz
    pub highpass: Option<f64>,
}

/// `Some(value)` unless the value equals the disabled sentinel
fn enabled_unless_zero(value: f64) -> Option<f64> {
    (value != 0.0).then_some(value)
}

impl From<&EffectRequest> for EffectConfig {
    /// Lower sentinel values into explicit options
    ///
    /// An effect is enabled when its governing parameter differs from the
    /// zero sentinel. Reverb is enabled when either room size or damping is
    /// set.
    fn from(request: &EffectRequest) -> Self {
        let reverb_enabled = request.reverb_room_size != 0.0 || request.reverb_damping != 0.0;
        Self {
            pitch_shift: (request.pitch_shift_semitones != 0)
                .then_some(request.pitch_shift_semitones),
            reverb: reverb_enabled.then_some(ReverbSettings {
                room_size: request.reverb_room_size,
                damping: request.reverb_damping,
            }),
            delay: enabled_unless_zero(request.delay_seconds),
            chorus: enabled_unless_zero(request.chorus_rate),
            distortion: enabled_unless_zero(request.distortion_gain_db),
            lowpass: enabled_unless_zero(request.lowpass_cutoff),
            highpass: enabled_unless_zero(request.highpass_cutoff),
        }
    }
}

impl From<EffectRequest> for EffectConfig {
    fn from(request: EffectRequest) -> Self {
        Self::from(&request)
    }
}

impl EffectConfig {
    /// Descriptors for every enabled effect, in chain order
    pub fn descriptors(&self) -> Vec<EffectDescriptor> {
        let candidates = [
            self.pitch_shift
                .map(|semitones| EffectDescriptor::PitchShift { semitones }),
            self.reverb.map(|r| EffectDescriptor::Reverb {
                room_size: r.room_size,
                damping: r.damping,
            }),
            self.delay.map(|seconds| EffectDescriptor::Delay { seconds }),
            self.chorus.map(|rate_hz| EffectDescriptor::Chorus { rate_hz }),
            self.distortion
                .map(|gain_db| EffectDescriptor::Distortion { gain_db }),
            self.lowpass
                .map(|cutoff_hz| EffectDescriptor::LowPass { cutoff_hz }),
            self.highpass
                .map(|cutoff_hz| EffectDescriptor::HighPass { cutoff_hz }),
        ];
        candidates.into_iter().flatten().collect()
    }

    /// Whether every effect is disabled
    pub fn is_empty(&self) -> bool {
        self.descriptors().is_empty()
    }
}
