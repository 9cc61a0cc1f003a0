//! bgmgen End-to-End Test Infrastructure
//!
//! This crate holds cross-crate tests for the rendering pipeline:
//!
//! - Generation: track document -> WAV file on disk
//! - Validation: bad documents are rejected before anything is written
//! - **Determinism**: identical tracks and seeds give byte-identical output
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bgmgen-tests
//! ```

pub mod determinism;
pub mod fixtures;
pub mod wav_check;

pub use determinism::{verify_determinism, DeterminismResult, DiffInfo};
pub use fixtures::{boss_track, soundtrack_path, track_json, TrackFixture};
pub use wav_check::{read_wav, read_wav_bytes, WavInfo};
