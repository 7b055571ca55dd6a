//! Audio Engine Module
//!
//! Core audio types shared by every pipeline stage:
//! - Waveform buffer management
//! - WAV encoding and file I/O

pub mod buffer;
pub mod io;

pub use buffer::{
    calculate_rms_db, db_to_linear, linear_to_db, peak_amplitude, Waveform, SILENCE_THRESHOLD,
    SPEECH_SAMPLE_RATE,
};
pub use io::{decode_wav, encode_wav, load_waveform, write_wav_file, WAV_HEADER_LEN};
