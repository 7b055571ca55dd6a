//! Effect descriptors
//!
//! A descriptor names one effect kind together with its validated
//! parameters. Descriptors are plain data; the backend turns them into
//! runnable units.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SpeechFxError};

// ============================================================================
// Parameter Ranges
// ============================================================================

/// Largest accepted pitch shift in either direction (two octaves)
pub const MAX_PITCH_SEMITONES: i32 = 24;

/// Longest accepted delay time in seconds
pub const MAX_DELAY_SECONDS: f64 = 2.0;

/// Fastest accepted chorus LFO rate in Hz
pub const MAX_CHORUS_RATE_HZ: f64 = 20.0;

/// Largest accepted distortion drive in dB
pub const MAX_DISTORTION_GAIN_DB: f64 = 60.0;

// ============================================================================
// Effect Kind
// ============================================================================

/// Effect kinds in chain order
///
/// The discriminant is the position in the chain. Pitch shifting before
/// reverb sounds different from the reverse, so the order is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    PitchShift = 0,
    Reverb = 1,
    Delay = 2,
    Chorus = 3,
    Distortion = 4,
    LowPass = 5,
    HighPass = 6,
}

impl EffectKind {
    /// All kinds, in chain order
    pub const ALL: [EffectKind; 7] = [
        EffectKind::PitchShift,
        EffectKind::Reverb,
        EffectKind::Delay,
        EffectKind::Chorus,
        EffectKind::Distortion,
        EffectKind::LowPass,
        EffectKind::HighPass,
    ];

    /// Position of this kind in the chain (0 = first)
    pub fn position(self) -> u32 {
        self as u32
    }

    /// Get string identifier
    pub fn as_str(self) -> &'static str {
        match self {
            EffectKind::PitchShift => "pitch_shift",
            EffectKind::Reverb => "reverb",
            EffectKind::Delay => "delay",
            EffectKind::Chorus => "chorus",
            EffectKind::Distortion => "distortion",
            EffectKind::LowPass => "lowpass",
            EffectKind::HighPass => "highpass",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Effect Descriptor
// ============================================================================

/// One requested effect and its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectDescriptor {
    /// Shift pitch by whole semitones
    PitchShift { semitones: i32 },
    /// Room reverb; room size and damping both in 0..=1
    Reverb { room_size: f64, damping: f64 },
    /// Feedback echo
    Delay { seconds: f64 },
    /// LFO-modulated chorus
    Chorus { rate_hz: f64 },
    /// Waveshaping distortion driven by an input gain
    Distortion { gain_db: f64 },
    /// Remove content above the cutoff
    LowPass { cutoff_hz: f64 },
    /// Remove content below the cutoff
    HighPass { cutoff_hz: f64 },
}

/// Inclusive range check that also rejects NaN
fn check_range(param: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(SpeechFxError::invalid_parameter(
            param,
            value,
            format!("{} to {}", min, max),
        ))
    }
}

/// Range check with an exclusive lower bound
fn check_positive(param: &str, value: f64, max: f64) -> Result<()> {
    if value > 0.0 && value <= max {
        Ok(())
    } else {
        Err(SpeechFxError::invalid_parameter(
            param,
            value,
            format!("greater than 0 and at most {}", max),
        ))
    }
}

fn check_cutoff(param: &str, cutoff_hz: f64) -> Result<()> {
    if cutoff_hz > 0.0 && cutoff_hz.is_finite() {
        Ok(())
    } else {
        Err(SpeechFxError::invalid_parameter(
            param,
            cutoff_hz,
            "greater than 0 Hz",
        ))
    }
}

impl EffectDescriptor {
    /// The kind of effect this descriptor configures
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectDescriptor::PitchShift { .. } => EffectKind::PitchShift,
            EffectDescriptor::Reverb { .. } => EffectKind::Reverb,
            EffectDescriptor::Delay { .. } => EffectKind::Delay,
            EffectDescriptor::Chorus { .. } => EffectKind::Chorus,
            EffectDescriptor::Distortion { .. } => EffectKind::Distortion,
            EffectDescriptor::LowPass { .. } => EffectKind::LowPass,
            EffectDescriptor::HighPass { .. } => EffectKind::HighPass,
        }
    }

    /// Check parameter ranges that do not depend on the sample rate
    pub fn validate(&self) -> Result<()> {
        match *self {
            EffectDescriptor::PitchShift { semitones } => {
                if semitones.unsigned_abs() > MAX_PITCH_SEMITONES.unsigned_abs() {
                    return Err(SpeechFxError::invalid_parameter(
                        "pitch_shift_semitones",
                        semitones,
                        format!("-{0} to {0}", MAX_PITCH_SEMITONES),
                    ));
                }
                Ok(())
            }
            EffectDescriptor::Reverb {
                room_size,
                damping,
            } => {
                check_range("reverb_room_size", room_size, 0.0, 1.0)?;
                check_range("reverb_damping", damping, 0.0, 1.0)
            }
            EffectDescriptor::Delay { seconds } => {
                check_positive("delay_seconds", seconds, MAX_DELAY_SECONDS)
            }
            EffectDescriptor::Chorus { rate_hz } => {
                check_positive("chorus_rate", rate_hz, MAX_CHORUS_RATE_HZ)
            }
            EffectDescriptor::Distortion { gain_db } => {
                check_range("distortion_gain_db", gain_db, 0.0, MAX_DISTORTION_GAIN_DB)
            }
            EffectDescriptor::LowPass { cutoff_hz } => check_cutoff("lowpass_cutoff", cutoff_hz),
            EffectDescriptor::HighPass { cutoff_hz } => check_cutoff("highpass_cutoff", cutoff_hz),
        }
    }

    /// Check parameters that depend on the sample rate
    ///
    /// Filter cutoffs must sit strictly below Nyquist.
    pub fn validate_for_rate(&self, sample_rate: u32) -> Result<()> {
        self.validate()?;
        let nyquist = sample_rate as f64 / 2.0;
        let (param, cutoff_hz) = match *self {
            EffectDescriptor::LowPass { cutoff_hz } => ("lowpass_cutoff", cutoff_hz),
            EffectDescriptor::HighPass { cutoff_hz } => ("highpass_cutoff", cutoff_hz),
            _ => return Ok(()),
        };
        if cutoff_hz >= nyquist {
            return Err(SpeechFxError::invalid_parameter(
                param,
                cutoff_hz,
                format!("below Nyquist ({} Hz)", nyquist),
            ));
        }
        Ok(())
    }

    /// Decay tail this effect adds after the input ends, in seconds
    ///
    /// Reverb decay is over-estimated as twice the room size.
    pub fn tail_seconds(&self) -> f64 {
        match *self {
            EffectDescriptor::Reverb { room_size, .. } => room_size * 2.0,
            EffectDescriptor::Delay { seconds } => seconds,
            _ => 0.0,
        }
    }
}
