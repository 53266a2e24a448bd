//! PCM payload decoding
//!
//! The speech collaborator returns base64-encoded raw PCM: signed 16-bit
//! little-endian, mono, 24 kHz. These constants are a hard contract with the
//! collaborator's output format and are never inferred from the payload.

use std::time::Duration;

use base64::Engine as _;

use crate::{Error, Result};

/// Sample rate of synthesized speech payloads
pub const SAMPLE_RATE: u32 = 24_000;

/// Channel count of synthesized speech payloads
pub const CHANNELS: u16 = 1;

/// Bytes per 16-bit sample
const BYTES_PER_SAMPLE: usize = 2;

/// Decoded audio, normalized to floating point
///
/// Immutable once produced and owned by the reply it was synthesized for.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: u16,
    sample_rate: u32,
    samples: Vec<f32>,
}

impl SampleBuffer {
    /// Package already-normalized samples
    ///
    /// Buffers are normally produced by [`decode_payload`]; this exists for
    /// callers that synthesize test signals.
    #[must_use]
    pub const fn new(channels: u16, sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            channels,
            sample_rate,
            samples,
        }
    }

    /// Normalized samples in `[-1.0, 1.0]`
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Channel count
    #[must_use]
    pub const fn channels(&self) -> u16 {
        self.channels
    }

    /// Sample rate in Hz
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames in the buffer (equals the sample count for mono)
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    /// Wall-clock length of the buffer
    #[must_use]
    pub fn duration(&self) -> Duration {
        let millis = (self.frame_count() as u64 * 1000) / u64::from(self.sample_rate);
        Duration::from_millis(millis)
    }
}

/// Decode a base64 PCM payload into a normalized sample buffer
///
/// All-or-nothing: a payload that is not valid base64, or whose decoded byte
/// length is not a multiple of the 2-byte sample width, fails without
/// producing a partial buffer. Each sample is normalized by dividing by
/// 32768.0, so values land in `[-1.0, 1.0)` with exactly -1.0 at minimum.
///
/// # Errors
///
/// Returns [`Error::Decode`] on invalid base64 or an odd byte length.
pub fn decode_payload(payload: &str) -> Result<SampleBuffer> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::Decode(format!("invalid base64 payload: {e}")))?;

    if bytes.len() % BYTES_PER_SAMPLE != 0 {
        return Err(Error::Decode(format!(
            "PCM payload truncated: {} bytes is not a multiple of the sample width",
            bytes.len()
        )));
    }

    let samples: Vec<f32> = bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
        .collect();

    tracing::debug!(
        samples = samples.len(),
        sample_rate = SAMPLE_RATE,
        "decoded speech payload"
    );

    Ok(SampleBuffer::new(CHANNELS, SAMPLE_RATE, samples))
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;

    use super::*;

    fn encode_pcm(samples: &[i16]) -> String {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn round_trips_synthetic_pcm() {
        let original: Vec<i16> = vec![0, 1, -1, 1000, -1000, i16::MAX, i16::MIN];
        let buffer = decode_payload(&encode_pcm(&original)).unwrap();

        assert_eq!(buffer.samples().len(), original.len());
        for (decoded, &raw) in buffer.samples().iter().zip(&original) {
            let expected = f32::from(raw) / 32768.0;
            assert!((decoded - expected).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn sample_count_is_half_the_byte_count() {
        let buffer = decode_payload(&encode_pcm(&[0; 480])).unwrap();
        assert_eq!(buffer.samples().len(), 480);
        assert_eq!(buffer.frame_count(), 480);
    }

    #[test]
    fn full_scale_extremes_stay_in_range() {
        let buffer = decode_payload(&encode_pcm(&[i16::MIN, i16::MAX])).unwrap();
        assert!((buffer.samples()[0] - (-1.0)).abs() < f32::EPSILON);
        assert!(buffer.samples()[1] < 1.0);
        assert!(buffer.samples()[1] > 0.9999);
    }

    #[test]
    fn known_payload_decodes_to_expected_samples() {
        // \x00\x00\xFF\x7F -> [0.0, 32767/32768]
        let payload = base64::engine::general_purpose::STANDARD.encode([0x00, 0x00, 0xFF, 0x7F]);
        let buffer = decode_payload(&payload).unwrap();

        assert_eq!(buffer.channels(), 1);
        assert_eq!(buffer.sample_rate(), 24_000);
        assert!((buffer.samples()[0] - 0.0).abs() < f32::EPSILON);
        assert!((buffer.samples()[1] - 32_767.0 / 32_768.0).abs() < f32::EPSILON);
    }

    #[test]
    fn odd_byte_length_is_rejected() {
        let payload = base64::engine::general_purpose::STANDARD.encode([0x00, 0x00, 0xFF]);
        let err = decode_payload(&payload).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let err = decode_payload("not base64 !!!").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn empty_payload_decodes_to_empty_buffer() {
        let buffer = decode_payload("").unwrap();
        assert!(buffer.samples().is_empty());
        assert_eq!(buffer.duration(), Duration::ZERO);
    }

    #[test]
    fn duration_reflects_sample_rate() {
        let one_second = vec![0_i16; 24_000];
        let buffer = decode_payload(&encode_pcm(&one_second)).unwrap();
        assert_eq!(buffer.duration(), Duration::from_secs(1));
    }
}
