//! Effect Chain management
//!
//! Effects are processed in chain order (index 0 first). The order is
//! fixed by [`EffectKind`]:
//! 1. Pitch shift
//! 2. Reverb
//! 3. Delay
//! 4. Chorus
//! 5. Distortion
//! 6. Low-pass
//! 7. High-pass
//!
//! Effects are inserted at their position regardless of the order they
//! are added in.

use serde::Serialize;

use super::descriptor::{EffectDescriptor, EffectKind};
use super::request::{EffectConfig, EffectRequest};
use crate::error::{Result, SpeechFxError};

/// Ordered, validated list of effects for one render
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EffectChain {
    effects: Vec<EffectDescriptor>,
}

impl EffectChain {
    /// Create a new empty effect chain
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// Build the chain for a wire request
    pub fn from_request(request: &EffectRequest) -> Result<Self> {
        Self::from_config(&EffectConfig::from(request))
    }

    /// Build the chain for an explicit configuration
    pub fn from_config(config: &EffectConfig) -> Result<Self> {
        let mut chain = Self::new();
        for descriptor in config.descriptors() {
            chain.add(descriptor)?;
        }
        Ok(chain)
    }

    /// Add an effect at its fixed position
    ///
    /// Fails if the descriptor is out of range or its kind is already present.
    pub fn add(&mut self, descriptor: EffectDescriptor) -> Result<()> {
        descriptor.validate()?;

        let kind = descriptor.kind();
        if self.contains(kind) {
            return Err(SpeechFxError::invalid_parameter(
                kind.as_str(),
                "duplicate",
                "at most one effect of each kind",
            ));
        }

        let position = self.get_position(kind);
        self.effects.insert(position, descriptor);
        Ok(())
    }

    /// Get the descriptor for a kind, if present
    pub fn get(&self, kind: EffectKind) -> Option<&EffectDescriptor> {
        self.effects.iter().find(|d| d.kind() == kind)
    }

    /// Whether the chain includes an effect of this kind
    pub fn contains(&self, kind: EffectKind) -> bool {
        self.get(kind).is_some()
    }

    /// Kinds present, in processing order
    pub fn kinds(&self) -> Vec<EffectKind> {
        self.effects.iter().map(|d| d.kind()).collect()
    }

    /// Get the number of effects in the chain
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Iterate over effects in processing order
    pub fn iter(&self) -> impl Iterator<Item = &EffectDescriptor> {
        self.effects.iter()
    }

    /// Delay time of the chain's delay effect, 0 if absent
    pub fn delay_seconds(&self) -> f64 {
        match self.get(EffectKind::Delay) {
            Some(EffectDescriptor::Delay { seconds }) => *seconds,
            _ => 0.0,
        }
    }

    /// Room size of the chain's reverb effect, 0 if absent
    pub fn reverb_room_size(&self) -> f64 {
        match self.get(EffectKind::Reverb) {
            Some(EffectDescriptor::Reverb { room_size, .. }) => *room_size,
            _ => 0.0,
        }
    }

    /// Index at which an effect of `kind` belongs
    fn get_position(&self, kind: EffectKind) -> usize {
        self.effects
            .iter()
            .position(|existing| existing.kind() > kind)
            .unwrap_or(self.effects.len())
    }
}

impl<'a> IntoIterator for &'a EffectChain {
    type Item = &'a EffectDescriptor;
    type IntoIter = std::slice::Iter<'a, EffectDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.effects.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_chain_new() {
        let chain = EffectChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_default_request_builds_empty_chain() {
        let chain = EffectChain::from_request(&EffectRequest::default()).unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_add_inserts_at_fixed_position() {
        let mut chain = EffectChain::new();
        chain
            .add(EffectDescriptor::HighPass { cutoff_hz: 100.0 })
            .unwrap();
        chain.add(EffectDescriptor::Delay { seconds: 0.1 }).unwrap();
        chain
            .add(EffectDescriptor::PitchShift { semitones: 3 })
            .unwrap();
        chain
            .add(EffectDescriptor::Distortion { gain_db: 6.0 })
            .unwrap();

        assert_eq!(
            chain.kinds(),
            vec![
                EffectKind::PitchShift,
                EffectKind::Delay,
                EffectKind::Distortion,
                EffectKind::HighPass
            ]
        );
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let mut chain = EffectChain::new();
        chain.add(EffectDescriptor::Chorus { rate_hz: 1.0 }).unwrap();
        let result = chain.add(EffectDescriptor::Chorus { rate_hz: 2.0 });
        assert!(matches!(result, Err(SpeechFxError::InvalidParameter { .. })));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_invalid_parameter_fails_build() {
        let request = EffectRequest {
            highpass_cutoff: -50.0,
            ..EffectRequest::default()
        };
        let err = EffectChain::from_request(&request).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    // Each request toggles exactly one governing parameter
    #[test_case(EffectRequest { pitch_shift_semitones: 5, ..Default::default() }, EffectKind::PitchShift ; "pitch up")]
    #[test_case(EffectRequest { pitch_shift_semitones: -5, ..Default::default() }, EffectKind::PitchShift ; "pitch down")]
    #[test_case(EffectRequest { reverb_room_size: 0.2, ..Default::default() }, EffectKind::Reverb ; "reverb room")]
    #[test_case(EffectRequest { reverb_damping: 0.2, ..Default::default() }, EffectKind::Reverb ; "reverb damping")]
    #[test_case(EffectRequest { delay_seconds: 0.3, ..Default::default() }, EffectKind::Delay ; "delay")]
    #[test_case(EffectRequest { chorus_rate: 1.2, ..Default::default() }, EffectKind::Chorus ; "chorus")]
    #[test_case(EffectRequest { distortion_gain_db: 12.0, ..Default::default() }, EffectKind::Distortion ; "distortion")]
    #[test_case(EffectRequest { lowpass_cutoff: 3000.0, ..Default::default() }, EffectKind::LowPass ; "lowpass")]
    #[test_case(EffectRequest { highpass_cutoff: 120.0, ..Default::default() }, EffectKind::HighPass ; "highpass")]
    fn test_single_effect_toggle(request: EffectRequest, expected: EffectKind) {
        let chain = EffectChain::from_request(&request).unwrap();
        assert_eq!(chain.kinds(), vec![expected]);
    }

    #[test]
    fn test_every_subset_keeps_fixed_order() {
        let full = EffectRequest {
            pitch_shift_semitones: 4,
            reverb_room_size: 0.3,
            reverb_damping: 0.5,
            delay_seconds: 0.25,
            chorus_rate: 1.5,
            distortion_gain_db: 10.0,
            lowpass_cutoff: 5000.0,
            highpass_cutoff: 90.0,
        };

        for mask in 0u32..(1 << 7) {
            let enabled = |kind: EffectKind| mask & (1 << kind.position()) != 0;
            let request = EffectRequest {
                pitch_shift_semitones: if enabled(EffectKind::PitchShift) { full.pitch_shift_semitones } else { 0 },
                reverb_room_size: if enabled(EffectKind::Reverb) { full.reverb_room_size } else { 0.0 },
                reverb_damping: if enabled(EffectKind::Reverb) { full.reverb_damping } else { 0.0 },
                delay_seconds: if enabled(EffectKind::Delay) { full.delay_seconds } else { 0.0 },
                chorus_rate: if enabled(EffectKind::Chorus) { full.chorus_rate } else { 0.0 },
                distortion_gain_db: if enabled(EffectKind::Distortion) { full.distortion_gain_db } else { 0.0 },
                lowpass_cutoff: if enabled(EffectKind::LowPass) { full.lowpass_cutoff } else { 0.0 },
                highpass_cutoff: if enabled(EffectKind::HighPass) { full.highpass_cutoff } else { 0.0 },
            };

            let chain = EffectChain::from_request(&request).unwrap();
            let expected: Vec<EffectKind> =
                EffectKind::ALL.into_iter().filter(|k| enabled(*k)).collect();
            assert_eq!(chain.kinds(), expected, "mask {:07b}", mask);
        }
    }

    #[test]
    fn test_tail_parameters() {
        let request = EffectRequest {
            reverb_room_size: 0.4,
            reverb_damping: 0.5,
            delay_seconds: 0.5,
            ..EffectRequest::default()
        };
        let chain = EffectChain::from_request(&request).unwrap();
        assert_eq!(chain.reverb_room_size(), 0.4);
        assert_eq!(chain.delay_seconds(), 0.5);

        let empty = EffectChain::new();
        assert_eq!(empty.reverb_room_size(), 0.0);
        assert_eq!(empty.delay_seconds(), 0.0);
    }

    #[test]
    fn test_chain_serializes_in_order() {
        let request = EffectRequest {
            lowpass_cutoff: 4000.0,
            pitch_shift_semitones: -2,
            ..EffectRequest::default()
        };
        let chain = EffectChain::from_request(&request).unwrap();
        let json = serde_json::to_value(&chain).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "effects": [
                    {"type": "pitch_shift", "semitones": -2},
                    {"type": "low_pass", "cutoff_hz": 4000.0}
                ]
            })
        );
    }
}
