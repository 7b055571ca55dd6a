//! Effect unit traits
//!
//! The pipeline never looks inside an effect. It asks an [`EffectBackend`]
//! for a unit matching each descriptor and runs it over the waveform.

use crate::dsp::descriptor::EffectDescriptor;
use crate::error::Result;

/// A single DSP unit operating on mono samples
///
/// Units process a slice in place, so output length always equals input
/// length. Any decay tail must fit into padding reserved beforehand.
pub trait EffectUnit: Send {
    /// Process samples in place
    fn process(&mut self, samples: &mut [f32]) -> Result<()>;

    /// Prepare the unit for the given sample rate
    ///
    /// Called once before the first `process` call. Sizes delay lines and
    /// computes rate-dependent coefficients.
    fn prepare(&mut self, sample_rate: u32);

    /// Clear internal state (filter history, delay lines)
    fn reset(&mut self);

    /// Get the effect type identifier
    fn effect_type(&self) -> &'static str;

    /// Get human-readable display name
    fn display_name(&self) -> &str;
}

/// Source of effect units
///
/// Lets the pipeline stay agnostic to which DSP implementation backs each
/// effect kind. Implementations must be shareable across concurrent renders;
/// every call returns a fresh unit so no state leaks between requests.
pub trait EffectBackend: Send + Sync {
    /// Build a prepared unit for `descriptor` at `sample_rate`
    fn create(&self, descriptor: &EffectDescriptor, sample_rate: u32)
        -> Result<Box<dyn EffectUnit>>;
}

impl<B: EffectBackend + ?Sized> EffectBackend for &B {
    fn create(
        &self,
        descriptor: &EffectDescriptor,
        sample_rate: u32,
    ) -> Result<Box<dyn EffectUnit>> {
        (**self).create(descriptor, sample_rate)
    }
}

/// Helper macro to implement common EffectUnit trait methods
#[macro_export]
macro_rules! impl_effect_common {
    ($effect_type:expr, $display_name:expr) => {
        fn effect_type(&self) -> &'static str {
            $effect_type
        }

        fn display_name(&self) -> &str {
            $display_name
        }
    };
}
