//! Service configuration
//!
//! Settings live in an optional JSON file. Environment variables can switch
//! on a default effect preset (pitch shift plus reverb); the caller supplies
//! the variable lookup so library code never reads the process environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::dsp::EffectRequest;
use crate::engine::{SILENCE_THRESHOLD, SPEECH_SAMPLE_RATE};
use crate::error::{Result, SpeechFxError};
use crate::pipeline::{Pipeline, PostProcessor};

/// Enables the default effect preset when set to `true` (case-insensitive)
pub const ENV_PROCESS_SOUND: &str = "PROCESS_SOUND";
/// Preset pitch shift in semitones
pub const ENV_PITCH_SHIFT_SEMITONES: &str = "PITCH_SHIFT_SEMITONES";
/// Preset reverb room size
pub const ENV_REVERB_ROOM_SIZE: &str = "REVERB_ROOM_SIZE";
/// Preset reverb damping
pub const ENV_REVERB_DAMPING: &str = "REVERB_DAMPING";

/// Preset room size when `REVERB_ROOM_SIZE` is unset
pub const DEFAULT_REVERB_ROOM_SIZE: f64 = 0.35;
/// Preset damping when `REVERB_DAMPING` is unset
pub const DEFAULT_REVERB_DAMPING: f64 = 0.5;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Rate the synthesizer produces and the pipeline expects
    pub sample_rate: u32,
    /// Trailing samples at or below this magnitude are trimmed
    pub silence_threshold: f32,
    /// Effects applied when a request does not override them
    pub default_effects: EffectRequest,
    /// `tracing` filter directive, used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            sample_rate: SPEECH_SAMPLE_RATE,
            silence_threshold: SILENCE_THRESHOLD,
            default_effects: EffectRequest::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check values that would make the pipeline unusable
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(SpeechFxError::invalid_parameter(
                "sample_rate",
                self.sample_rate,
                "> 0 Hz",
            ));
        }
        PostProcessor::with_threshold(self.silence_threshold)?;
        Ok(())
    }

    /// Apply the environment preset using `lookup` to read variables
    ///
    /// When `PROCESS_SOUND` is `true`, pitch shift and reverb defaults are
    /// taken from the environment (room size 0.35 and damping 0.5 when
    /// unset). Otherwise the configuration is left untouched.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = lookup(ENV_PROCESS_SOUND)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if !enabled {
            return Ok(());
        }

        let effects = &mut self.default_effects;
        effects.pitch_shift_semitones = parse_env(&lookup, ENV_PITCH_SHIFT_SEMITONES, 0)?;
        effects.reverb_room_size =
            parse_env(&lookup, ENV_REVERB_ROOM_SIZE, DEFAULT_REVERB_ROOM_SIZE)?;
        effects.reverb_damping = parse_env(&lookup, ENV_REVERB_DAMPING, DEFAULT_REVERB_DAMPING)?;
        Ok(())
    }

    /// Build a pipeline honoring the sample rate and silence threshold
    pub fn pipeline(&self) -> Result<Pipeline> {
        let post = PostProcessor::with_threshold(self.silence_threshold)?;
        Ok(Pipeline::new()
            .with_sample_rate(self.sample_rate)?
            .with_post_processor(post))
    }
}

fn parse_env<T, F>(lookup: &F, name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SpeechFxError::invalid_parameter(name, raw, "a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.sample_rate, 16000);
        assert_eq!(config.default_effects, EffectRequest::default());
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_env_preset_disabled_by_default() {
        let mut config = ServiceConfig::default();
        config
            .apply_env(env(&[(ENV_REVERB_ROOM_SIZE, "0.9")]))
            .unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_env_preset_uses_defaults() {
        let mut config = ServiceConfig::default();
        config.apply_env(env(&[(ENV_PROCESS_SOUND, "TRUE")])).unwrap();
        assert_eq!(config.default_effects.pitch_shift_semitones, 0);
        assert_eq!(config.default_effects.reverb_room_size, 0.35);
        assert_eq!(config.default_effects.reverb_damping, 0.5);
    }

    #[test]
    fn test_env_preset_reads_values() {
        let mut config = ServiceConfig::default();
        config
            .apply_env(env(&[
                (ENV_PROCESS_SOUND, "true"),
                (ENV_PITCH_SHIFT_SEMITONES, "-3"),
                (ENV_REVERB_ROOM_SIZE, "0.6"),
                (ENV_REVERB_DAMPING, "0.2"),
            ]))
            .unwrap();
        assert_eq!(config.default_effects.pitch_shift_semitones, -3);
        assert_eq!(config.default_effects.reverb_room_size, 0.6);
        assert_eq!(config.default_effects.reverb_damping, 0.2);
    }

    #[test]
    fn test_env_preset_rejects_garbage() {
        let mut config = ServiceConfig::default();
        let err = config
            .apply_env(env(&[
                (ENV_PROCESS_SOUND, "true"),
                (ENV_PITCH_SHIFT_SEMITONES, "lots"),
            ]))
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    #[test]
    fn test_json_partial_config() {
        let config =
            ServiceConfig::from_json(r#"{"default_effects": {"delay_seconds": 0.2}}"#).unwrap();
        assert_eq!(config.default_effects.delay_seconds, 0.2);
        assert_eq!(config.sample_rate, 16000);
    }

    #[test]
    fn test_json_rejects_zero_rate() {
        assert!(ServiceConfig::from_json(r#"{"sample_rate": 0}"#).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("speech-fx.json");
        let mut config = ServiceConfig::default();
        config.silence_threshold = 0.001;
        config.default_effects.chorus_rate = 1.5;

        config.save(&path).unwrap();
        assert_eq!(ServiceConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_pipeline_from_config() {
        let config = ServiceConfig {
            silence_threshold: 0.01,
            ..ServiceConfig::default()
        };
        let pipeline = config.pipeline().unwrap();
        assert_eq!(pipeline.post_processor().threshold(), 0.01);
        assert_eq!(pipeline.sample_rate(), 16000);
    }
}
