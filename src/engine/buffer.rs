//! Waveform Buffer
//!
//! Mono float waveform produced by the synthesizer and mutated in place
//! by every pipeline stage.

use crate::error::{Result, SpeechFxError};

// ============================================================================
// Constants
// ============================================================================

/// Sample rate of synthesized speech (16kHz)
pub const SPEECH_SAMPLE_RATE: u32 = 16000;

/// Amplitude at or below which a trailing sample counts as silence
pub const SILENCE_THRESHOLD: f32 = 1e-4;

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// Returns -f32::INFINITY for zero input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Largest absolute sample value, 0.0 for an empty slice
pub fn peak_amplitude(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// RMS level of a slice in dB. Returns -f32::INFINITY for empty or silent input.
pub fn calculate_rms_db(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return f32::NEG_INFINITY;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    linear_to_db((sum_squares / samples.len() as f64).sqrt() as f32)
}

/// Index of the first non-finite sample, if any
pub fn first_non_finite(samples: &[f32]) -> Option<usize> {
    samples.iter().position(|s| !s.is_finite())
}

// ============================================================================
// Waveform
// ============================================================================

fn check_sample_rate(sample_rate: u32) -> Result<()> {
    if sample_rate == 0 {
        return Err(SpeechFxError::invalid_parameter(
            "sample_rate",
            sample_rate,
            "> 0 Hz",
        ));
    }
    Ok(())
}

/// Mono audio at a fixed sample rate
///
/// Invariant: every sample is finite. Constructors check it; pipeline
/// stages re-check after each effect unit runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Create a waveform, rejecting NaN/Inf samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        if let Some(index) = first_non_finite(&samples) {
            return Err(SpeechFxError::NonFiniteSample { index });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Create a waveform at the speech sample rate
    pub fn from_speech(samples: Vec<f32>) -> Result<Self> {
        Self::new(samples, SPEECH_SAMPLE_RATE)
    }

    /// Create a silent waveform of `len` samples
    pub fn silence(len: usize, sample_rate: u32) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        Ok(Self {
            samples: vec![0.0; len],
            sample_rate,
        })
    }

    /// Create a sine wave test tone
    pub fn sine_wave(
        frequency: f32,
        amplitude: f32,
        duration_secs: f32,
        sample_rate: u32,
    ) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        let num_samples = (duration_secs * sample_rate as f32) as usize;
        let samples = (0..num_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect();

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> f32 {
        peak_amplitude(&self.samples)
    }

    /// Append `count` zero samples
    pub fn extend_silence(&mut self, count: usize) {
        self.samples.resize(self.samples.len() + count, 0.0);
    }

    /// Shorten to `len` samples (no-op if already shorter)
    pub fn truncate(&mut self, len: usize) {
        self.samples.truncate(len);
    }

    /// Multiply every sample by `gain`
    pub fn apply_gain(&mut self, gain: f32) {
        for sample in &mut self.samples {
            *sample *= gain;
        }
    }

    /// Check the finiteness invariant
    pub fn validate(&self) -> Result<()> {
        match first_non_finite(&self.samples) {
            Some(index) => Err(SpeechFxError::NonFiniteSample { index }),
            None => Ok(()),
        }
    }
}
