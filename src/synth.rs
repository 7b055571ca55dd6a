//! Speech synthesis seam
//!
//! The text-to-speech model is a black box that turns text into a mono
//! float waveform. Anything implementing [`SpeechSynthesizer`] can feed the
//! pipeline.

use std::f32::consts::TAU;

use crate::engine::{Waveform, SPEECH_SAMPLE_RATE};
use crate::error::{Result, SpeechFxError};

/// Text-to-speech model
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into a mono waveform
    fn synthesize(&self, text: &str) -> Result<Waveform>;

    /// Rate of the waveforms this synthesizer produces
    fn sample_rate(&self) -> u32 {
        SPEECH_SAMPLE_RATE
    }
}

/// Deterministic stand-in for a real model
///
/// Emits one short enveloped tone per character, with pitch derived from
/// the character, and a gap of silence for whitespace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSynthesizer {
    /// Length of each character's tone in seconds
    pub char_seconds: f32,
    /// Peak amplitude of each tone
    pub amplitude: f32,
    /// Output sample rate in Hz
    pub sample_rate: u32,
}

impl Default for ToneSynthesizer {
    fn default() -> Self {
        Self {
            char_seconds: 0.06,
            amplitude: 0.6,
            sample_rate: SPEECH_SAMPLE_RATE,
        }
    }
}

impl ToneSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render at `sample_rate` instead of the speech default
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Tone frequency for a character, spread over a speech-like band
    fn frequency_for(c: char) -> f32 {
        110.0 + (c as u32 % 48) as f32 * 10.0
    }

    fn samples_per_char(&self) -> usize {
        (self.char_seconds * self.sample_rate as f32).round() as usize
    }
}

impl SpeechSynthesizer for ToneSynthesizer {
    fn synthesize(&self, text: &str) -> Result<Waveform> {
        if text.trim().is_empty() {
            return Err(SpeechFxError::EmptyText);
        }

        let per_char = self.samples_per_char();
        let mut samples = Vec::with_capacity(per_char * text.chars().count());

        for c in text.chars() {
            if c.is_whitespace() {
                samples.resize(samples.len() + per_char, 0.0);
                continue;
            }
            let freq = Self::frequency_for(c);
            samples.extend((0..per_char).map(|i| {
                let t = i as f32 / self.sample_rate as f32;
                // Sine envelope keeps each tone click-free
                let envelope = (std::f32::consts::PI * i as f32 / per_char as f32).sin();
                self.amplitude * envelope * (TAU * freq * t).sin()
            }));
        }

        Waveform::new(samples, self.sample_rate)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_tone_per_character() {
        let synth = ToneSynthesizer::new();
        let waveform = synth.synthesize("hi there").unwrap();
        assert_eq!(waveform.sample_rate(), 16000);
        assert_eq!(waveform.len(), 8 * 960);
    }

    #[test]
    fn test_whitespace_is_silent() {
        let synth = ToneSynthesizer::new();
        let waveform = synth.synthesize("a b").unwrap();
        assert!(waveform.samples()[960..1920].iter().all(|&s| s == 0.0));
        assert!(waveform.peak() > 0.0);
        assert!(waveform.peak() <= 0.6);
    }

    #[test]
    fn test_custom_sample_rate() {
        let synth = ToneSynthesizer::new().with_sample_rate(22050);
        assert_eq!(synth.sample_rate(), 22050);
        let waveform = synth.synthesize("ab").unwrap();
        assert_eq!(waveform.sample_rate(), 22050);
        // 0.06 s at 22050 Hz rounds to 1323 samples
        assert_eq!(waveform.len(), 2 * 1323);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let synth = ToneSynthesizer::new().with_sample_rate(0);
        assert!(matches!(
            synth.synthesize("a"),
            Err(SpeechFxError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_deterministic() {
        let synth = ToneSynthesizer::new();
        assert_eq!(synth.synthesize("hello").unwrap(), synth.synthesize("hello").unwrap());
    }

    #[test]
    fn test_empty_text_rejected() {
        let synth = ToneSynthesizer::new();
        assert!(matches!(synth.synthesize(""), Err(SpeechFxError::EmptyText)));
        assert!(matches!(synth.synthesize("  \n"), Err(SpeechFxError::EmptyText)));
    }
}
