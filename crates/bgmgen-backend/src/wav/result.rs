//! Rendered WAV output.

use std::io;

use crate::mixer::StereoBuffer;
use crate::quantize::{quantize, BYTES_PER_FRAME};

use super::format::WavFormat;
use super::writer::write_wav_to_vec;

/// A rendered WAV file and facts about it.
#[derive(Debug, Clone)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hex digest of the PCM body only.
    pub pcm_hash: String,
    /// Frame rate in Hz.
    pub sample_rate: u32,
    /// Number of stereo frames.
    pub num_frames: usize,
}

impl WavResult {
    /// Wraps already-quantized interleaved stereo PCM.
    pub fn from_pcm(pcm: &[u8], sample_rate: u32) -> io::Result<Self> {
        let wav_data = write_wav_to_vec(&WavFormat::stereo(sample_rate), pcm)?;
        Ok(Self {
            wav_data,
            pcm_hash: blake3::hash(pcm).to_hex().to_string(),
            sample_rate,
            num_frames: pcm.len() / BYTES_PER_FRAME,
        })
    }

    /// Quantizes and wraps a stereo mix.
    pub fn from_stereo(buffer: &StereoBuffer, sample_rate: u32) -> io::Result<Self> {
        Self::from_pcm(&quantize(buffer), sample_rate)
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_frames as f64 / self.sample_rate as f64
    }

    /// The PCM body of [`WavResult::wav_data`].
    pub fn pcm_data(&self) -> &[u8] {
        self.wav_data.get(super::HEADER_LEN..).unwrap_or_default()
    }
}
