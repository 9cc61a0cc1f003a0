//! WAV format parameters.

/// Sample format of a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels.
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
    /// Always 16.
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// 16-bit interleaved stereo.
    pub fn stereo(sample_rate: u32) -> Self {
        Self {
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    /// Bytes per frame across all channels.
    pub fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    /// Bytes per second of audio.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}
