//! Post-processing
//!
//! Mandatory final steps, always in this order:
//! 1. Peak normalization to unit amplitude
//! 2. Trailing-silence trim
//! 3. Quantization to signed 16-bit PCM

use tracing::debug;

use crate::engine::{Waveform, SILENCE_THRESHOLD};
use crate::error::{Result, SpeechFxError};

/// Full-scale value used when quantizing
pub const PCM_SCALE: f32 = 32767.0;

/// Scale samples so the largest magnitude becomes 1.0
///
/// Silent input (peak of zero) is left unchanged.
pub fn normalize_peak(waveform: &mut Waveform) {
    let peak = waveform.peak();
    if peak > 0.0 {
        // Divide rather than multiply by the reciprocal so the peak lands exactly on 1.0
        for sample in waveform.samples_mut() {
            *sample /= peak;
        }
    }
}

/// Drop every trailing sample whose magnitude is at or below `threshold`
///
/// Returns the number of samples removed. A waveform with no sample above
/// the threshold collapses to length 0.
pub fn trim_trailing_silence(waveform: &mut Waveform, threshold: f32) -> usize {
    let original = waveform.len();
    let keep = waveform
        .samples()
        .iter()
        .rposition(|s| s.abs() > threshold)
        .map_or(0, |last| last + 1);
    waveform.truncate(keep);
    original - keep
}

/// Convert to signed 16-bit PCM, truncating toward zero
///
/// 1.0 maps to 32767 and -1.0 to -32767. Values are expected to lie in
/// [-1, 1]; anything outside saturates at the `i16` bounds.
pub fn quantize(samples: &[f32]) -> Vec<i16> {
    samples.iter().map(|&s| (s * PCM_SCALE) as i16).collect()
}

/// Normalize, trim and quantize a processed waveform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostProcessor {
    threshold: f32,
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PostProcessor {
    /// Post-processor with the default silence threshold (1e-4)
    pub fn new() -> Self {
        Self {
            threshold: SILENCE_THRESHOLD,
        }
    }

    /// Post-processor with a custom silence threshold
    pub fn with_threshold(threshold: f32) -> Result<Self> {
        if !(threshold >= 0.0 && threshold < 1.0) {
            return Err(SpeechFxError::invalid_parameter(
                "silence_threshold",
                threshold,
                "0.0 to below 1.0",
            ));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Run all three steps, consuming the waveform
    pub fn run(&self, mut waveform: Waveform) -> Vec<i16> {
        normalize_peak(&mut waveform);
        let trimmed = trim_trailing_silence(&mut waveform, self.threshold);
        debug!(trimmed, remaining = waveform.len(), "post-processed waveform");
        quantize(waveform.samples())
    }
}
