//! PCM extraction and hashing for written WAV files.

/// Returns the body of the `data` chunk of a WAV file.
///
/// Chunks before `data` are skipped, honoring RIFF word alignment.
/// Returns `None` if the buffer is not a RIFF/WAVE file or the data chunk is
/// missing or truncated.
pub fn extract_pcm_data(wav_data: &[u8]) -> Option<&[u8]> {
    if wav_data.len() < 12 || &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    while pos + 8 <= wav_data.len() {
        let chunk_id = &wav_data[pos..pos + 4];
        let chunk_size = u32::from_le_bytes([
            wav_data[pos + 4],
            wav_data[pos + 5],
            wav_data[pos + 6],
            wav_data[pos + 7],
        ]) as usize;
        let body_start = pos + 8;
        let body_end = body_start.checked_add(chunk_size)?;

        if chunk_id == b"data" {
            return wav_data.get(body_start..body_end);
        }

        pos = body_end + (chunk_size % 2);
    }

    None
}

/// BLAKE3 hex digest of the PCM body of a WAV file.
pub fn compute_pcm_hash(wav_data: &[u8]) -> Option<String> {
    extract_pcm_data(wav_data).map(|pcm| blake3::hash(pcm).to_hex().to_string())
}
