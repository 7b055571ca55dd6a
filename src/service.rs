//! Speech service
//!
//! Text in, processed WAV out: synthesis followed by the pipeline.

use tracing::info;

use crate::dsp::{BuiltinEffects, EffectBackend, EffectConfig, EffectRequest};
use crate::error::{Result, SpeechFxError};
use crate::pipeline::{Pipeline, RenderedAudio};
use crate::synth::SpeechSynthesizer;

/// Synthesizer plus post-processing pipeline
#[derive(Debug, Clone)]
pub struct SpeechService<S: SpeechSynthesizer, B: EffectBackend = BuiltinEffects> {
    synthesizer: S,
    pipeline: Pipeline<B>,
}

impl<S: SpeechSynthesizer> SpeechService<S, BuiltinEffects> {
    /// Service using the built-in effects at the synthesizer's sample rate
    pub fn new(synthesizer: S) -> Result<Self> {
        let pipeline = Pipeline::new().with_sample_rate(synthesizer.sample_rate())?;
        Ok(Self {
            synthesizer,
            pipeline,
        })
    }
}

impl<S: SpeechSynthesizer, B: EffectBackend> SpeechService<S, B> {
    /// Service with an explicitly configured pipeline
    pub fn with_pipeline(synthesizer: S, pipeline: Pipeline<B>) -> Self {
        Self {
            synthesizer,
            pipeline,
        }
    }

    pub fn pipeline(&self) -> &Pipeline<B> {
        &self.pipeline
    }

    pub fn synthesizer(&self) -> &S {
        &self.synthesizer
    }

    /// Synthesize `text`, apply the requested effects and return WAV bytes
    ///
    /// Text that is empty or only whitespace is rejected with `EmptyText`.
    pub fn generate_speech(&self, text: &str, request: &EffectRequest) -> Result<Vec<u8>> {
        self.generate(text, &EffectConfig::from(request))?.to_wav()
    }

    /// Synthesize and process, returning PCM and the render report
    ///
    /// Whitespace-only text counts as empty: there is nothing to speak.
    pub fn generate(&self, text: &str, config: &EffectConfig) -> Result<RenderedAudio> {
        if text.trim().is_empty() {
            return Err(SpeechFxError::EmptyText);
        }
        info!(chars = text.chars().count(), "synthesizing speech");
        let waveform = self.synthesizer.synthesize(text)?;
        self.pipeline.render_pcm(waveform, config)
    }
}
