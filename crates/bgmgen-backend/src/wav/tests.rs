//! Tests for the WAV writer.

use std::io::Cursor;

use pretty_assertions::assert_eq;

use crate::mixer::StereoBuffer;

use super::format::WavFormat;
use super::pcm::{compute_pcm_hash, extract_pcm_data};
use super::result::WavResult;
use super::writer::{write_wav, write_wav_to_vec, HEADER_LEN, MAX_DATA_LEN};

fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn u16_at(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

// =========================================================================
// Format tests
// =========================================================================

#[test]
fn test_stereo_format() {
    let format = WavFormat::stereo(44100);
    assert_eq!(format.channels, 2);
    assert_eq!(format.bits_per_sample, 16);
    assert_eq!(format.block_align(), 4);
    assert_eq!(format.byte_rate(), 176_400);
}

// =========================================================================
// Header tests
// =========================================================================

#[test]
fn test_header_layout() {
    let pcm = vec![0u8; 16];
    let wav = write_wav_to_vec(&WavFormat::stereo(44100), &pcm).unwrap();

    assert_eq!(wav.len(), HEADER_LEN + 16);
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(u32_at(&wav, 4), 36 + 16);
    assert_eq!(&wav[8..12], b"WAVE");
    assert_eq!(&wav[12..16], b"fmt ");
    assert_eq!(u32_at(&wav, 16), 16);
    assert_eq!(u16_at(&wav, 20), 1);
    assert_eq!(u16_at(&wav, 22), 2);
    assert_eq!(u32_at(&wav, 24), 44100);
    assert_eq!(u32_at(&wav, 28), 176_400);
    assert_eq!(u16_at(&wav, 32), 4);
    assert_eq!(u16_at(&wav, 34), 16);
    assert_eq!(&wav[36..40], b"data");
    assert_eq!(u32_at(&wav, 40), 16);
}

#[test]
fn test_empty_body_is_valid() {
    let wav = write_wav_to_vec(&WavFormat::stereo(44100), &[]).unwrap();
    assert_eq!(wav.len(), HEADER_LEN);
    assert_eq!(u32_at(&wav, 4), 36);
    assert_eq!(extract_pcm_data(&wav), Some(&[][..]));
}

#[test]
fn test_body_is_copied_verbatim() {
    let pcm: Vec<u8> = (0..=255u8).collect();
    let mut out = Vec::new();
    write_wav(&mut out, &WavFormat::stereo(22050), &pcm).unwrap();
    assert_eq!(&out[HEADER_LEN..], &pcm[..]);
}

#[test]
fn test_max_data_len_leaves_room_for_header() {
    assert_eq!(MAX_DATA_LEN as u64 + 36, u32::MAX as u64);
}

#[test]
fn test_hound_reads_output() {
    let buffer = StereoBuffer {
        left: vec![1000.0, -2000.0, 40000.0],
        right: vec![-1.5, 0.0, -40000.0],
    };
    let result = WavResult::from_stereo(&buffer, 44100).unwrap();

    let reader = hound::WavReader::new(Cursor::new(result.wav_data.clone())).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);

    let samples: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, vec![1000, -1, -2000, 0, 32767, -32768]);
}

// =========================================================================
// PCM extraction tests
// =========================================================================

#[test]
fn test_extract_rejects_non_wav() {
    assert_eq!(extract_pcm_data(b"not a wav file at all"), None);
    assert_eq!(extract_pcm_data(&[]), None);
}

#[test]
fn test_extract_skips_unknown_chunks() {
    let mut wav = Vec::new();
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&0u32.to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"LIST");
    wav.extend_from_slice(&3u32.to_le_bytes());
    wav.extend_from_slice(&[1, 2, 3, 0]); // odd chunk plus pad byte
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&2u32.to_le_bytes());
    wav.extend_from_slice(&[7, 8]);

    assert_eq!(extract_pcm_data(&wav), Some(&[7u8, 8][..]));
}

#[test]
fn test_extract_rejects_truncated_data() {
    let mut wav = write_wav_to_vec(&WavFormat::stereo(44100), &[0u8; 8]).unwrap();
    wav.truncate(HEADER_LEN + 4);
    assert_eq!(extract_pcm_data(&wav), None);
}

#[test]
fn test_result_hash_matches_file_hash() {
    let buffer = StereoBuffer {
        left: vec![10.0; 32],
        right: vec![-10.0; 32],
    };
    let result = WavResult::from_stereo(&buffer, 44100).unwrap();
    assert_eq!(result.num_frames, 32);
    assert_eq!(result.pcm_data().len(), 128);
    assert_eq!(compute_pcm_hash(&result.wav_data), Some(result.pcm_hash.clone()));
}

#[test]
fn test_duration_seconds() {
    let result = WavResult::from_stereo(&StereoBuffer::silent(22050), 44100).unwrap();
    assert_eq!(result.duration_seconds(), 0.5);
}
