//! Tail padding
//!
//! Effects with decay (reverb, delay) keep ringing after the input ends.
//! Units process in place and never grow the buffer, so silence is appended
//! up front to give the tail somewhere to land.

use tracing::debug;

use crate::engine::Waveform;

/// Number of silent samples needed to hold the decay tail
///
/// `floor(max(delay_seconds, reverb_room_size * 2) * sample_rate)`, computed
/// in `f64`. Inputs are expected to be validated (non-negative) already.
pub fn tail_padding_samples(delay_seconds: f64, reverb_room_size: f64, sample_rate: u32) -> usize {
    let tail_seconds = delay_seconds.max(reverb_room_size * 2.0);
    if tail_seconds <= 0.0 || !tail_seconds.is_finite() {
        return 0;
    }
    (tail_seconds * sample_rate as f64).floor() as usize
}

/// Append `padding` zero samples to the end of the waveform
pub fn pad_tail(waveform: &mut Waveform, padding: usize) {
    if padding == 0 {
        return;
    }
    debug!(padding, original_len = waveform.len(), "padding decay tail");
    waveform.extend_silence(padding);
}
