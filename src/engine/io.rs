//! WAV encoding and decoding
//!
//! Output is always canonical mono 16-bit PCM: a 44-byte RIFF/WAVE header
//! (16-byte `fmt ` chunk, `data` chunk) followed by little-endian samples.
//! No metadata chunks are written.

use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::engine::buffer::Waveform;
use crate::error::{Result, SpeechFxError};

/// Size of the RIFF/WAVE header preceding PCM data
pub const WAV_HEADER_LEN: usize = 44;

/// Bit depth of encoded output
pub const PCM_BITS_PER_SAMPLE: u16 = 16;

fn pcm_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: PCM_BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// Encode 16-bit PCM samples into an in-memory WAV file
///
/// An empty buffer produces a valid header with a zero-length data chunk.
pub fn encode_wav(pcm: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    if sample_rate == 0 {
        return Err(SpeechFxError::invalid_parameter(
            "sample_rate",
            sample_rate,
            "> 0 Hz",
        ));
    }

    let mut bytes = Vec::with_capacity(WAV_HEADER_LEN + pcm.len() * 2);
    {
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), pcm_spec(sample_rate))?;
        for &sample in pcm {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(bytes)
}

/// Decode an in-memory WAV file back into PCM samples and sample rate
pub fn decode_wav(bytes: &[u8]) -> Result<(Vec<i16>, u32)> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    if spec.channels != 1
        || spec.bits_per_sample != PCM_BITS_PER_SAMPLE
        || spec.sample_format != SampleFormat::Int
    {
        return Err(SpeechFxError::UnsupportedFormat {
            format: format!(
                "{}-channel {}-bit {:?} (expected mono 16-bit PCM)",
                spec.channels, spec.bits_per_sample, spec.sample_format
            ),
        });
    }

    let samples = reader
        .into_samples::<i16>()
        .collect::<std::result::Result<Vec<i16>, hound::Error>>()?;
    Ok((samples, spec.sample_rate))
}

/// Load a mono WAV file as a float waveform
///
/// Integer formats are scaled to [-1.0, 1.0); float files are read as-is.
/// The file's own sample rate is kept; callers decide whether it is acceptable.
pub fn load_waveform(path: &Path) -> Result<Waveform> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(SpeechFxError::UnsupportedFormat {
            format: format!("{}-channel audio (only mono supported)", spec.channels),
        });
    }

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, hound::Error>>()?,
        SampleFormat::Int => {
            let max_val = (1u32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<f32>, hound::Error>>()?
        }
    };

    Waveform::new(samples, spec.sample_rate)
}

/// Write encoded WAV bytes to disk
pub fn write_wav_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn test_header_layout() {
        let pcm = [0i16, 1, -1, i16::MAX, i16::MIN];
        let bytes = encode_wav(&pcm, 16000).unwrap();

        assert_eq!(bytes.len(), WAV_HEADER_LEN + pcm.len() * 2);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32_at(&bytes, 4) as usize, bytes.len() - 8);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u32_at(&bytes, 16), 16); // fmt chunk size
        assert_eq!(u16_at(&bytes, 20), 1); // PCM
        assert_eq!(u16_at(&bytes, 22), 1); // mono
        assert_eq!(u32_at(&bytes, 24), 16000); // sample rate
        assert_eq!(u32_at(&bytes, 28), 32000); // byte rate
        assert_eq!(u16_at(&bytes, 32), 2); // block align
        assert_eq!(u16_at(&bytes, 34), 16); // bits per sample
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32_at(&bytes, 40) as usize, pcm.len() * 2);
    }

    #[test]
    fn test_samples_are_little_endian() {
        let bytes = encode_wav(&[0x0102, -2], 16000).unwrap();
        assert_eq!(&bytes[44..48], &[0x02, 0x01, 0xFE, 0xFF]);
    }

    #[test]
    fn test_empty_pcm_has_empty_data_chunk() {
        let bytes = encode_wav(&[], 16000).unwrap();
        assert_eq!(bytes.len(), WAV_HEADER_LEN);
        assert_eq!(u32_at(&bytes, 4), 36);
        assert_eq!(u32_at(&bytes, 40), 0);

        let (samples, rate) = decode_wav(&bytes).unwrap();
        assert!(samples.is_empty());
        assert_eq!(rate, 16000);
    }

    #[test]
    fn test_hound_reads_encoded_output() {
        let pcm: Vec<i16> = (0..100).map(|i| (i * 300 - 15000) as i16).collect();
        let bytes = encode_wav(&pcm, 22050).unwrap();

        let (decoded, rate) = decode_wav(&bytes).unwrap();
        assert_eq!(rate, 22050);
        assert_eq!(decoded, pcm);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        assert!(matches!(
            encode_wav(&[0], 0),
            Err(SpeechFxError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_stereo() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut bytes = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
            writer.write_sample(0i16).unwrap();
            writer.write_sample(0i16).unwrap();
            writer.finalize().unwrap();
        }

        assert!(matches!(
            decode_wav(&bytes),
            Err(SpeechFxError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_load_waveform_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("speech.wav");

        let bytes = encode_wav(&[16384, -16384, 0], 16000).unwrap();
        write_wav_file(&path, &bytes).unwrap();

        let waveform = load_waveform(&path).unwrap();
        assert_eq!(waveform.sample_rate(), 16000);
        assert_eq!(waveform.samples(), &[0.5, -0.5, 0.0]);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_waveform(Path::new("nonexistent_file.wav"));
        assert!(matches!(result, Err(SpeechFxError::Wav(_))));
    }
}
