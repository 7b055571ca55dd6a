//! CLI Module
//!
//! Command-line front-end for the speech-fx pipeline.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// speech-fx - synthesized speech with a configurable effect chain
#[derive(Parser, Debug)]
#[command(name = "speech-fx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize text and write the processed WAV
    #[command(name = "speak")]
    Speak {
        /// Text to synthesize
        text: String,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        effects: EffectArgs,
    },

    /// Run a 16 kHz mono WAV through the effect pipeline
    #[command(name = "process")]
    Process {
        /// Input WAV file standing in for synthesizer output
        input: PathBuf,

        /// Output WAV file (defaults to <input>_processed.wav)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        effects: EffectArgs,
    },

    /// Print the resolved effect chain as JSON
    #[command(name = "chain")]
    Chain {
        #[command(flatten)]
        effects: EffectArgs,
    },
}

/// Per-request effect parameters
///
/// Flags left unset keep the configured default. A value of 0 disables the
/// effect.
#[derive(Args, Debug, Clone, Default)]
pub struct EffectArgs {
    /// JSON effect request file; replaces the configured defaults
    #[arg(long)]
    pub request: Option<PathBuf>,

    /// Pitch shift in semitones
    #[arg(long, allow_hyphen_values = true)]
    pub pitch: Option<i32>,

    /// Reverb room size (0-1)
    #[arg(long)]
    pub room_size: Option<f64>,

    /// Reverb damping (0-1)
    #[arg(long)]
    pub damping: Option<f64>,

    /// Delay time in seconds
    #[arg(long)]
    pub delay: Option<f64>,

    /// Chorus LFO rate in Hz
    #[arg(long)]
    pub chorus: Option<f64>,

    /// Distortion drive in dB
    #[arg(long)]
    pub distortion: Option<f64>,

    /// Low-pass cutoff in Hz
    #[arg(long)]
    pub lowpass: Option<f64>,

    /// High-pass cutoff in Hz
    #[arg(long)]
    pub highpass: Option<f64>,
}
