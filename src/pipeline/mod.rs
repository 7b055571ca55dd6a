//! Audio post-processing pipeline
//!
//! Stages, in order:
//! 1. Tail padding (room for reverb/delay decay)
//! 2. Effect chain construction and application
//! 3. Normalize, trim, quantize
//! 4. WAV encoding
//!
//! A `Pipeline` holds no per-render state and can be shared across threads.

pub mod padding;
pub mod post;

pub use padding::{pad_tail, tail_padding_samples};
pub use post::{normalize_peak, quantize, trim_trailing_silence, PostProcessor};

use serde::Serialize;
use tracing::{debug, info, info_span};
use uuid::Uuid;

use crate::dsp::{
    BuiltinEffects, EffectBackend, EffectChain, EffectConfig, EffectKind, EffectRequest,
    SignalProcessor,
};
use crate::engine::{encode_wav, Waveform, SPEECH_SAMPLE_RATE};
use crate::error::{Result, SpeechFxError};

/// Summary of one render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderReport {
    /// Identifier attached to this render's log lines
    pub request_id: Uuid,
    /// Effects applied, in order
    pub effects: Vec<EffectKind>,
    /// Samples received from the synthesizer
    pub input_samples: usize,
    /// Silent samples appended for the decay tail
    pub padding_samples: usize,
    /// Samples written to the WAV data chunk
    pub output_samples: usize,
}

/// Output of a render: PCM samples plus its report
#[derive(Debug, Clone)]
pub struct RenderedAudio {
    pub pcm: Vec<i16>,
    pub sample_rate: u32,
    pub report: RenderReport,
}

impl RenderedAudio {
    /// Encode the PCM as a mono 16-bit WAV
    pub fn to_wav(&self) -> Result<Vec<u8>> {
        encode_wav(&self.pcm, self.sample_rate)
    }
}

/// Post-processing pipeline from raw waveform to WAV bytes
#[derive(Debug, Clone)]
pub struct Pipeline<B: EffectBackend = BuiltinEffects> {
    sample_rate: u32,
    processor: SignalProcessor<B>,
    post: PostProcessor,
}

impl Default for Pipeline<BuiltinEffects> {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline<BuiltinEffects> {
    /// Pipeline at the speech sample rate with the built-in effects
    pub fn new() -> Self {
        Self::with_backend(BuiltinEffects)
    }
}

impl<B: EffectBackend> Pipeline<B> {
    /// Pipeline at the speech sample rate using a custom effect backend
    pub fn with_backend(backend: B) -> Self {
        Self {
            sample_rate: SPEECH_SAMPLE_RATE,
            processor: SignalProcessor::with_backend(backend),
            post: PostProcessor::new(),
        }
    }

    /// Accept waveforms at a different rate
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(SpeechFxError::invalid_parameter(
                "sample_rate",
                sample_rate,
                "> 0 Hz",
            ));
        }
        self.sample_rate = sample_rate;
        Ok(self)
    }

    /// Replace the post-processor (e.g. for a custom silence threshold)
    pub fn with_post_processor(mut self, post: PostProcessor) -> Self {
        self.post = post;
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn post_processor(&self) -> &PostProcessor {
        &self.post
    }

    /// Render a waveform with per-request effects into WAV bytes
    pub fn render(&self, waveform: Waveform, request: &EffectRequest) -> Result<Vec<u8>> {
        self.render_config(waveform, &EffectConfig::from(request))
    }

    /// Render with an explicit effect configuration into WAV bytes
    pub fn render_config(&self, waveform: Waveform, config: &EffectConfig) -> Result<Vec<u8>> {
        self.render_pcm(waveform, config)?.to_wav()
    }

    /// Run every stage except WAV encoding
    ///
    /// Any failure is fatal for the render; no partial audio is returned.
    pub fn render_pcm(&self, mut waveform: Waveform, config: &EffectConfig) -> Result<RenderedAudio> {
        let request_id = Uuid::new_v4();
        let span = info_span!("render", %request_id);
        let _enter = span.enter();

        if waveform.sample_rate() != self.sample_rate {
            return Err(SpeechFxError::SampleRateMismatch {
                expected: self.sample_rate,
                actual: waveform.sample_rate(),
            });
        }
        waveform.validate()?;

        // Build (and validate) the chain before touching audio
        let chain = EffectChain::from_config(config)?;
        let input_samples = waveform.len();

        let padding_samples =
            tail_padding_samples(chain.delay_seconds(), chain.reverb_room_size(), self.sample_rate);
        pad_tail(&mut waveform, padding_samples);

        debug!(effects = chain.len(), "applying effect chain");
        self.processor.process(&chain, &mut waveform)?;

        let pcm = self.post.run(waveform);

        let report = RenderReport {
            request_id,
            effects: chain.kinds(),
            input_samples,
            padding_samples,
            output_samples: pcm.len(),
        };
        info!(
            input_samples,
            padding_samples,
            output_samples = report.output_samples,
            effects = ?report.effects,
            "render complete"
        );

        Ok(RenderedAudio {
            pcm,
            sample_rate: self.sample_rate,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::decode_wav;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_constant_input_default_request() {
        let pipeline = Pipeline::new();
        let waveform = Waveform::from_speech(vec![0.5; 8000]).unwrap();
        let wav = pipeline.render(waveform, &EffectRequest::default()).unwrap();

        let (pcm, rate) = decode_wav(&wav).unwrap();
        assert_eq!(rate, 16000);
        assert_eq!(pcm.len(), 8000);
        assert!(pcm.iter().all(|&s| s == 32767));
    }

    #[test]
    fn test_reverb_render_pads_tail() {
        let pipeline = Pipeline::new();
        let decay: Vec<f32> = (0..1000).map(|i| 1.0 - i as f32 / 1000.0).collect();
        let waveform = Waveform::from_speech(decay).unwrap();
        let config = EffectConfig::from(&EffectRequest {
            reverb_room_size: 0.1,
            ..EffectRequest::default()
        });

        let rendered = pipeline.render_pcm(waveform, &config).unwrap();
        assert_eq!(rendered.report.padding_samples, 3200);
        assert_eq!(rendered.report.effects, vec![EffectKind::Reverb]);
        assert!(rendered.pcm.len() <= 4200);
        assert!(rendered.pcm.len() >= 900);
    }

    #[test]
    fn test_silent_input_yields_empty_wav() {
        let pipeline = Pipeline::new();
        let wav = pipeline
            .render(Waveform::silence(500, 16000).unwrap(), &EffectRequest::default())
            .unwrap();
        assert_eq!(wav.len(), 44);
    }

    #[test]
    fn test_sample_rate_mismatch() {
        let pipeline = Pipeline::new();
        let waveform = Waveform::new(vec![0.1; 10], 22050).unwrap();
        let err = pipeline.render(waveform, &EffectRequest::default()).unwrap_err();
        assert!(matches!(
            err,
            SpeechFxError::SampleRateMismatch {
                expected: 16000,
                actual: 22050
            }
        ));
    }

    #[test]
    fn test_invalid_request_fails_before_processing() {
        let pipeline = Pipeline::new();
        let waveform = Waveform::from_speech(vec![0.1; 10]).unwrap();
        let request = EffectRequest {
            lowpass_cutoff: 9000.0,
            ..EffectRequest::default()
        };
        let err = pipeline.render(waveform, &request).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    #[test]
    fn test_custom_sample_rate() {
        let pipeline = Pipeline::new().with_sample_rate(22050).unwrap();
        let waveform = Waveform::new(vec![0.25; 100], 22050).unwrap();
        let rendered = pipeline.render_pcm(waveform, &EffectConfig::default()).unwrap();
        assert_eq!(rendered.sample_rate, 22050);
        assert_eq!(rendered.pcm.len(), 100);

        assert!(Pipeline::new().with_sample_rate(0).is_err());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let pipeline = Pipeline::new();
        let a = pipeline
            .render_pcm(Waveform::from_speech(vec![0.1]).unwrap(), &EffectConfig::default())
            .unwrap();
        let b = pipeline
            .render_pcm(Waveform::from_speech(vec![0.1]).unwrap(), &EffectConfig::default())
            .unwrap();
        assert_ne!(a.report.request_id, b.report.request_id);
    }
}
