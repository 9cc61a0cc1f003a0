//! RIFF/WAVE serialization.

use std::io::{self, Write};

use super::format::WavFormat;

/// Size of the canonical header in bytes.
pub const HEADER_LEN: usize = 44;

/// Largest PCM body whose RIFF size field (`36 + len`) still fits in a `u32`.
pub const MAX_DATA_LEN: usize = (u32::MAX - 36) as usize;

fn data_len(pcm_data: &[u8]) -> io::Result<u32> {
    u32::try_from(pcm_data.len())
        .ok()
        .filter(|&len| len as usize <= MAX_DATA_LEN)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "PCM data of {} bytes exceeds the WAV limit of {} bytes",
                    pcm_data.len(),
                    MAX_DATA_LEN
                ),
            )
        })
}

/// Writes a complete WAV file: header then `pcm_data` verbatim.
///
/// Fails with [`io::ErrorKind::InvalidInput`] when `pcm_data` is longer than
/// [`MAX_DATA_LEN`].
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = data_len(pcm_data)?;

    writer.write_all(b"RIFF")?;
    writer.write_all(&(36 + data_size).to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?; // PCM fmt chunk size
    writer.write_all(&1u16.to_le_bytes())?; // format tag: integer PCM
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&format.bits_per_sample.to_le_bytes())?;

    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;

    Ok(())
}

/// Writes a WAV file into memory.
pub fn write_wav_to_vec(format: &WavFormat, pcm_data: &[u8]) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(HEADER_LEN + pcm_data.len());
    write_wav(&mut buffer, format, pcm_data)?;
    Ok(buffer)
}
