//! Low-pass and high-pass filters
//!
//! Second-order Butterworth sections using the Audio EQ Cookbook formulas.

use crate::dsp::effect::EffectUnit;
use crate::error::{Result, SpeechFxError};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Pass filter response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Remove above frequency
    LowPass,
    /// Remove below frequency
    HighPass,
}

/// Biquad filter coefficients
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (a0 + a1*z^-1 + a2*z^-2)
/// Normalized: all coefficients divided by a0
#[derive(Debug, Clone, Copy, Default)]
struct BiquadCoeffs {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl BiquadCoeffs {
    /// Calculate coefficients for a Butterworth (Q = 1/sqrt(2)) section
    fn calculate(filter_type: FilterType, sample_rate: f64, frequency: f64) -> Self {
        let w0 = 2.0 * PI * frequency / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * FRAC_1_SQRT_2);

        let (b0, b1, b2) = match filter_type {
            FilterType::LowPass => (
                (1.0 - cos_w0) / 2.0,
                1.0 - cos_w0,
                (1.0 - cos_w0) / 2.0,
            ),
            FilterType::HighPass => (
                (1.0 + cos_w0) / 2.0,
                -(1.0 + cos_w0),
                (1.0 + cos_w0) / 2.0,
            ),
        };
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha;

        BiquadCoeffs {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Biquad filter history
#[derive(Debug, Clone, Copy, Default)]
struct BiquadState {
    x1: f64, // x[n-1]
    x2: f64, // x[n-2]
    y1: f64, // y[n-1]
    y2: f64, // y[n-2]
}

impl BiquadState {
    /// Direct Form I
    #[inline]
    fn process(&mut self, input: f64, coeffs: &BiquadCoeffs) -> f64 {
        let output = coeffs.b0 * input + coeffs.b1 * self.x1 + coeffs.b2 * self.x2
            - coeffs.a1 * self.y1
            - coeffs.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }
}

/// Single biquad pass filter
#[derive(Debug, Clone)]
pub struct PassFilter {
    filter_type: FilterType,
    cutoff_hz: f64,
    coeffs: Option<BiquadCoeffs>,
    state: BiquadState,
}

impl PassFilter {
    /// Create a filter; cutoff must be positive and finite
    pub fn new(filter_type: FilterType, cutoff_hz: f64) -> Result<Self> {
        if !(cutoff_hz > 0.0 && cutoff_hz.is_finite()) {
            return Err(SpeechFxError::invalid_parameter(
                Self::param_name(filter_type),
                cutoff_hz,
                "greater than 0 Hz",
            ));
        }
        Ok(Self {
            filter_type,
            cutoff_hz,
            coeffs: None,
            state: BiquadState::default(),
        })
    }

    /// Create a low-pass filter
    pub fn low_pass(cutoff_hz: f64) -> Result<Self> {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    /// Create a high-pass filter
    pub fn high_pass(cutoff_hz: f64) -> Result<Self> {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    fn param_name(filter_type: FilterType) -> &'static str {
        match filter_type {
            FilterType::LowPass => "lowpass_cutoff",
            FilterType::HighPass => "highpass_cutoff",
        }
    }
}

impl EffectUnit for PassFilter {
    fn process(&mut self, samples: &mut [f32]) -> Result<()> {
        let coeffs = self.coeffs.ok_or_else(|| SpeechFxError::ProcessingFailure {
            effect: self.effect_type().to_string(),
            reason: format!(
                "cutoff {} Hz is not below Nyquist, or prepare was not called",
                self.cutoff_hz
            ),
        })?;

        for sample in samples.iter_mut() {
            *sample = self.state.process(*sample as f64, &coeffs) as f32;
        }
        Ok(())
    }

    /// Coefficients are only computed when the cutoff is below Nyquist
    fn prepare(&mut self, sample_rate: u32) {
        let rate = sample_rate as f64;
        self.coeffs = (self.cutoff_hz < rate / 2.0)
            .then(|| BiquadCoeffs::calculate(self.filter_type, rate, self.cutoff_hz));
        self.state = BiquadState::default();
    }

    fn reset(&mut self) {
        self.state = BiquadState::default();
    }

    fn effect_type(&self) -> &'static str {
        match self.filter_type {
            FilterType::LowPass => "lowpass",
            FilterType::HighPass => "highpass",
        }
    }

    fn display_name(&self) -> &str {
        match self.filter_type {
            FilterType::LowPass => "Low-Pass Filter",
            FilterType::HighPass => "High-Pass Filter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{calculate_rms_db, Waveform};
    use approx::assert_relative_eq;

    const RATE: u32 = 16000;

    /// Steady-state RMS (dB) of a filtered sine, skipping the transient
    fn filtered_rms_db(filter: &mut PassFilter, frequency: f32) -> f32 {
        filter.prepare(RATE);
        let mut samples = Waveform::sine_wave(frequency, 0.5, 1.0, RATE).unwrap().into_samples();
        let reference = calculate_rms_db(&samples[4000..]);
        filter.process(&mut samples).unwrap();
        calculate_rms_db(&samples[4000..]) - reference
    }

    #[test]
    fn test_rejects_bad_cutoff() {
        assert!(PassFilter::low_pass(0.0).is_err());
        assert!(PassFilter::high_pass(-200.0).is_err());
        assert!(PassFilter::low_pass(f64::NAN).is_err());
    }

    #[test]
    fn test_lowpass_attenuates_above_cutoff() {
        let mut filter = PassFilter::low_pass(1000.0).unwrap();
        let pass = filtered_rms_db(&mut filter, 200.0);
        let mut filter = PassFilter::low_pass(1000.0).unwrap();
        let stop = filtered_rms_db(&mut filter, 5000.0);

        assert!(pass.abs() < 0.5, "passband change {} dB", pass);
        assert!(stop < -20.0, "stopband change {} dB", stop);
    }

    #[test]
    fn test_highpass_attenuates_below_cutoff() {
        let mut filter = PassFilter::high_pass(2000.0).unwrap();
        let stop = filtered_rms_db(&mut filter, 200.0);
        let mut filter = PassFilter::high_pass(2000.0).unwrap();
        let pass = filtered_rms_db(&mut filter, 6000.0);

        assert!(stop < -30.0, "stopband change {} dB", stop);
        assert!(pass.abs() < 1.0, "passband change {} dB", pass);
    }

    #[test]
    fn test_cutoff_is_minus_three_db() {
        let mut filter = PassFilter::low_pass(1000.0).unwrap();
        let at_cutoff = filtered_rms_db(&mut filter, 1000.0);
        assert_relative_eq!(at_cutoff, -3.01, epsilon = 0.2);
    }

    #[test]
    fn test_cutoff_at_nyquist_fails_processing() {
        let mut filter = PassFilter::low_pass(8000.0).unwrap();
        filter.prepare(RATE);
        let result = filter.process(&mut [0.1, 0.2]);
        assert!(matches!(result, Err(SpeechFxError::ProcessingFailure { .. })));
    }

    #[test]
    fn test_effect_names() {
        assert_eq!(PassFilter::low_pass(100.0).unwrap().effect_type(), "lowpass");
        assert_eq!(PassFilter::high_pass(100.0).unwrap().effect_type(), "highpass");
    }
}
