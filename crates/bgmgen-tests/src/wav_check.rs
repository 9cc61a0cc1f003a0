//! Independent WAV reading through `hound`.

use std::io::{Cursor, Read};
use std::path::Path;

/// What a WAV reader sees in a rendered file.
#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub frames: u32,
    /// Interleaved samples.
    pub samples: Vec<i16>,
}

impl WavInfo {
    /// Left-channel samples.
    pub fn left(&self) -> impl Iterator<Item = i16> + '_ {
        self.samples.iter().step_by(2).copied()
    }

    /// Right-channel samples.
    pub fn right(&self) -> impl Iterator<Item = i16> + '_ {
        self.samples.iter().skip(1).step_by(2).copied()
    }
}

/// Reads a 16-bit WAV file.
pub fn read_wav(path: &Path) -> Result<WavInfo, hound::Error> {
    collect(hound::WavReader::open(path)?)
}

/// Reads 16-bit WAV data already in memory.
pub fn read_wav_bytes(bytes: &[u8]) -> Result<WavInfo, hound::Error> {
    collect(hound::WavReader::new(Cursor::new(bytes))?)
}

fn collect<R: Read>(reader: hound::WavReader<R>) -> Result<WavInfo, hound::Error> {
    let spec = reader.spec();
    let frames = reader.duration();
    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        frames,
        samples,
    })
}
