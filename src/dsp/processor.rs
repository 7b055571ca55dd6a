//! Signal processor
//!
//! Runs an [`EffectChain`] over a waveform in place, one unit per
//! descriptor, in chain order.

use tracing::{debug, warn};

use super::chain::EffectChain;
use super::effect::EffectBackend;
use super::BuiltinEffects;
use crate::engine::buffer::first_non_finite;
use crate::engine::Waveform;
use crate::error::{Result, SpeechFxError};

/// Applies effect chains using a pluggable backend
#[derive(Debug, Clone, Default)]
pub struct SignalProcessor<B: EffectBackend = BuiltinEffects> {
    backend: B,
}

impl SignalProcessor<BuiltinEffects> {
    /// Processor backed by the built-in effect units
    pub fn new() -> Self {
        Self {
            backend: BuiltinEffects,
        }
    }
}

impl<B: EffectBackend> SignalProcessor<B> {
    /// Processor backed by a custom backend
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Apply every effect in `chain` to `waveform`
    ///
    /// All descriptors are checked against the waveform's sample rate before
    /// any sample is touched. The waveform length never changes. An empty
    /// chain leaves the samples untouched.
    pub fn process(&self, chain: &EffectChain, waveform: &mut Waveform) -> Result<()> {
        let sample_rate = waveform.sample_rate();
        for descriptor in chain {
            descriptor.validate_for_rate(sample_rate)?;
        }

        for descriptor in chain {
            let kind = descriptor.kind();
            let mut unit = self.backend.create(descriptor, sample_rate)?;
            debug!(effect = %kind, unit = unit.display_name(), "applying effect");

            unit.process(waveform.samples_mut()).map_err(|e| match e {
                SpeechFxError::ProcessingFailure { .. } => e,
                other => SpeechFxError::ProcessingFailure {
                    effect: kind.to_string(),
                    reason: other.to_string(),
                },
            })?;

            if let Some(index) = first_non_finite(waveform.samples()) {
                warn!(effect = %kind, index, "effect produced a non-finite sample");
                return Err(SpeechFxError::ProcessingFailure {
                    effect: kind.to_string(),
                    reason: format!("non-finite sample at index {}", index),
                });
            }
        }
        Ok(())
    }
}
