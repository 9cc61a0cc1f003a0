//! Conversion of the floating-point mix to 16-bit PCM.

use crate::mixer::StereoBuffer;

/// Bytes per interleaved stereo frame.
pub const BYTES_PER_FRAME: usize = 4;

/// Saturates a sample to the `i16` range and truncates toward zero.
///
/// NaN maps to 0.
pub fn quantize_sample(sample: f64) -> i16 {
    sample.clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Quantizes a buffer to interleaved little-endian 16-bit PCM bytes.
pub fn quantize(buffer: &StereoBuffer) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(buffer.len() * BYTES_PER_FRAME);
    for (&l, &r) in buffer.left.iter().zip(buffer.right.iter()) {
        pcm.extend_from_slice(&quantize_sample(l).to_le_bytes());
        pcm.extend_from_slice(&quantize_sample(r).to_le_bytes());
    }
    pcm
}

/// Counts samples that saturate during quantization.
pub fn count_clipped(buffer: &StereoBuffer) -> usize {
    buffer
        .left
        .iter()
        .chain(buffer.right.iter())
        .filter(|&&s| s > i16::MAX as f64 || s < i16::MIN as f64)
        .count()
}
