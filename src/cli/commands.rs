//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::info;

use super::EffectArgs;
use crate::config::ServiceConfig;
use crate::dsp::{EffectChain, EffectConfig, EffectRequest};
use crate::engine::{load_waveform, write_wav_file};
use crate::pipeline::RenderReport;
use crate::service::SpeechService;
use crate::synth::ToneSynthesizer;

/// What a command wrote to disk
#[derive(Debug, Clone)]
pub struct OutputSummary {
    pub path: PathBuf,
    pub bytes: usize,
    /// Lowercase hex SHA-256 of the file contents
    pub sha256: String,
    pub report: RenderReport,
}

/// Load the configuration file (if any) and apply the environment preset
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    let mut config = match path {
        Some(path) => ServiceConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    config
        .apply_env(|name| std::env::var(name).ok())
        .context("Invalid effect preset in environment")?;
    Ok(config)
}

/// Combine configured defaults, an optional request file and flags
///
/// A request file replaces the defaults as a whole; each flag that is set
/// then overrides its single field.
pub fn resolve_request(defaults: &EffectRequest, args: &EffectArgs) -> Result<EffectRequest> {
    let mut request = match &args.request {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read request: {}", path.display()))?;
            EffectRequest::from_json(&json)
                .with_context(|| format!("Invalid request file: {}", path.display()))?
        }
        None => *defaults,
    };

    if let Some(v) = args.pitch {
        request.pitch_shift_semitones = v;
    }
    if let Some(v) = args.room_size {
        request.reverb_room_size = v;
    }
    if let Some(v) = args.damping {
        request.reverb_damping = v;
    }
    if let Some(v) = args.delay {
        request.delay_seconds = v;
    }
    if let Some(v) = args.chorus {
        request.chorus_rate = v;
    }
    if let Some(v) = args.distortion {
        request.distortion_gain_db = v;
    }
    if let Some(v) = args.lowpass {
        request.lowpass_cutoff = v;
    }
    if let Some(v) = args.highpass {
        request.highpass_cutoff = v;
    }
    Ok(request)
}

/// Synthesize `text`, process it and write the WAV to `output`
pub fn speak(
    config: &ServiceConfig,
    text: &str,
    output: &Path,
    args: &EffectArgs,
) -> Result<OutputSummary> {
    info!("Synthesizing {} characters to: {}", text.chars().count(), output.display());

    let request = resolve_request(&config.default_effects, args)?;
    let synthesizer = ToneSynthesizer::new().with_sample_rate(config.sample_rate);
    let service = SpeechService::with_pipeline(synthesizer, config.pipeline()?);
    let rendered = service
        .generate(text, &EffectConfig::from(&request))
        .context("Error generating speech")?;
    let wav = rendered.to_wav()?;

    write_output(output, &wav, rendered.report)
}

/// Run an existing WAV file through the pipeline
pub fn process(
    config: &ServiceConfig,
    input: &Path,
    output: Option<&Path>,
    args: &EffectArgs,
) -> Result<OutputSummary> {
    info!("Processing audio: {}", input.display());

    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => default_output_path(input),
    };

    let request = resolve_request(&config.default_effects, args)?;
    let waveform = load_waveform(input)
        .with_context(|| format!("Failed to read input: {}", input.display()))?;
    let rendered = config
        .pipeline()?
        .render_pcm(waveform, &EffectConfig::from(&request))
        .context("Error processing audio")?;
    let wav = rendered.to_wav()?;

    write_output(&output_path, &wav, rendered.report)
}

/// Resolve and validate the chain, returning it as pretty JSON
pub fn chain_json(config: &ServiceConfig, args: &EffectArgs) -> Result<String> {
    let request = resolve_request(&config.default_effects, args)?;
    let chain = EffectChain::from_request(&request).context("Invalid effect parameters")?;
    for descriptor in &chain {
        descriptor.validate_for_rate(config.sample_rate)?;
    }
    Ok(serde_json::to_string_pretty(&chain)?)
}

/// `<stem>_processed.wav` next to the input
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_processed.wav", stem))
}

fn write_output(path: &Path, wav: &[u8], report: RenderReport) -> Result<OutputSummary> {
    write_wav_file(path, wav).with_context(|| format!("Failed to write: {}", path.display()))?;

    let summary = OutputSummary {
        path: path.to_path_buf(),
        bytes: wav.len(),
        sha256: format!("{:x}", Sha256::digest(wav)),
        report,
    };

    println!("Wrote: {}", summary.path.display());
    println!("Size: {} bytes", summary.bytes);
    println!("SHA-256: {}", summary.sha256);
    if summary.report.effects.is_empty() {
        println!("Effects: none");
    } else {
        let names: Vec<&str> = summary.report.effects.iter().map(|k| k.as_str()).collect();
        println!("Effects: {}", names.join(" -> "));
    }
    println!("Padding: {} samples", summary.report.padding_samples);

    Ok(summary)
}
