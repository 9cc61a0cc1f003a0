//! Deterministic WAV container writer.
//!
//! Output is a canonical 44-byte RIFF/WAVE header followed by the PCM body.
//! There are no timestamps or optional chunks, so equal PCM always yields
//! byte-identical files.

mod format;
mod pcm;
mod result;
mod writer;

#[cfg(test)]
mod tests;

pub use format::WavFormat;
pub use pcm::{compute_pcm_hash, extract_pcm_data};
pub use result::WavResult;
pub use writer::{write_wav, write_wav_to_vec, HEADER_LEN, MAX_DATA_LEN};
