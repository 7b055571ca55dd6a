//! DSP Effects Library
//!
//! Effect descriptors, chain construction and the built-in effect units.
//! All units implement the `EffectUnit` trait for uniform processing.

mod chain;
mod chorus;
mod delay;
pub mod descriptor;
mod distortion;
mod effect;
mod filter;
mod pitch;
pub mod processor;
pub mod request;
mod reverb;

pub use chain::EffectChain;
pub use chorus::Chorus;
pub use delay::Delay;
pub use descriptor::{EffectDescriptor, EffectKind};
pub use distortion::Distortion;
pub use effect::{EffectBackend, EffectUnit};
pub use filter::{FilterType, PassFilter};
pub use pitch::{semitones_to_ratio, PitchShift};
pub use processor::SignalProcessor;
pub use request::{EffectConfig, EffectRequest, ReverbSettings};
pub use reverb::Reverb;

use crate::error::Result;

/// Backend serving every effect kind with the units in this module
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEffects;

impl EffectBackend for BuiltinEffects {
    fn create(&self, descriptor: &EffectDescriptor, sample_rate: u32) -> Result<Box<dyn EffectUnit>> {
        let mut unit: Box<dyn EffectUnit> = match *descriptor {
            EffectDescriptor::PitchShift { semitones } => Box::new(PitchShift::new(semitones)?),
            EffectDescriptor::Reverb { room_size, damping } => {
                Box::new(Reverb::new(room_size, damping)?)
            }
            EffectDescriptor::Delay { seconds } => Box::new(Delay::new(seconds)?),
            EffectDescriptor::Chorus { rate_hz } => Box::new(Chorus::new(rate_hz)?),
            EffectDescriptor::Distortion { gain_db } => Box::new(Distortion::new(gain_db)?),
            EffectDescriptor::LowPass { cutoff_hz } => Box::new(PassFilter::low_pass(cutoff_hz)?),
            EffectDescriptor::HighPass { cutoff_hz } => Box::new(PassFilter::high_pass(cutoff_hz)?),
        };
        unit.prepare(sample_rate);
        Ok(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_backend_covers_every_kind() {
        let descriptors = [
            EffectDescriptor::PitchShift { semitones: 3 },
            EffectDescriptor::Reverb { room_size: 0.4, damping: 0.5 },
            EffectDescriptor::Delay { seconds: 0.2 },
            EffectDescriptor::Chorus { rate_hz: 1.5 },
            EffectDescriptor::Distortion { gain_db: 6.0 },
            EffectDescriptor::LowPass { cutoff_hz: 3000.0 },
            EffectDescriptor::HighPass { cutoff_hz: 100.0 },
        ];
        for descriptor in &descriptors {
            let mut unit = BuiltinEffects.create(descriptor, 16000).unwrap();
            assert_eq!(unit.effect_type(), descriptor.kind().as_str());

            let mut samples = vec![0.25; 256];
            unit.process(&mut samples).unwrap();
            assert_eq!(samples.len(), 256);
        }
    }

    #[test]
    fn test_builtin_backend_rejects_invalid_parameters() {
        let result = BuiltinEffects.create(&EffectDescriptor::Delay { seconds: -1.0 }, 16000);
        assert!(result.is_err());
    }
}
