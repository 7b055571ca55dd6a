//! speech-fx - Speech Post-Processing Pipeline
//!
//! Turns a synthesized speech waveform into a finished WAV file:
//! 1. Tail padding so reverb and delay decay is not cut off
//! 2. An effect chain in fixed order (pitch, reverb, delay, chorus,
//!    distortion, low-pass, high-pass), each effect enabled per request
//! 3. Peak normalization, trailing-silence trim and 16-bit quantization
//! 4. Mono 16-bit PCM WAV encoding
//!
//! # Architecture
//!
//! - `engine`: waveform buffer and WAV I/O
//! - `dsp`: effect descriptors, chain builder, signal processor and the
//!   built-in effect units
//! - `pipeline`: padding and post-processing stages wired into `Pipeline`
//! - `synth` / `service`: text-to-speech seam and the text-to-WAV service

pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod service;
pub mod synth;

pub use config::ServiceConfig;
pub use dsp::{EffectChain, EffectConfig, EffectDescriptor, EffectKind, EffectRequest};
pub use engine::Waveform;
pub use error::{Result, SpeechFxError};
pub use pipeline::{Pipeline, RenderReport};
pub use service::SpeechService;
pub use synth::{SpeechSynthesizer, ToneSynthesizer};
