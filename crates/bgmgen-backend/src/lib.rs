//! bgmgen Render Backend
//!
//! This crate turns a [`bgmgen_spec::TrackSpec`] into a 16-bit stereo WAV
//! file at 44100 Hz.
//!
//! # Overview
//!
//! Rendering is a straight pipeline:
//!
//! - **Sequencing** - the track is cut into sixteenth-note steps and each
//!   step is planned as up to three voice events (bass, melody, percussion)
//! - **Synthesis** - every event becomes a square-wave tone or a noise burst
//!   shaped by an envelope
//! - **Mixing** - events are summed into a stereo buffer with fixed pans
//! - **Quantization** - the mix is saturated to `i16` and written as WAV
//!
//! # Determinism
//!
//! Tones are pure functions of the track. Noise draws from a PCG32 stream
//! seeded through BLAKE3, so a track and a seed always give byte-identical
//! output.
//!
//! # Example
//!
//! ```
//! use bgmgen_backend::generate;
//! use bgmgen_spec::{Pattern, TrackSpec};
//!
//! let track = TrackSpec::builder("stage1")
//!     .tempo(130.0)
//!     .duration(1.0)
//!     .bass(Pattern::parse(&["C2", "-", "C3", "-"]).unwrap())
//!     .melody(Pattern::parse(&["C4", "Eb4", "G4", "C5"]).unwrap())
//!     .build();
//!
//! let result = generate(&track).unwrap();
//! assert_eq!(&result.wav.wav_data[0..4], b"RIFF");
//! println!("PCM hash: {}", result.wav.pcm_hash);
//! ```
//!
//! # Crate Structure
//!
//! - [`generate()`] - Main entry point
//! - [`sequencer`] - Step grid and per-step voice planning
//! - [`percussion`] - Ordered percussion rules
//! - [`oscillator`] - Square-wave and noise generators
//! - [`envelope`] - Envelope shapes
//! - [`mixer`] - Stereo accumulation buffer
//! - [`quantize`] - Float to 16-bit PCM conversion
//! - [`rng`] - Deterministic RNG with seed derivation
//! - [`wav`] - Deterministic WAV writer

pub mod envelope;
pub mod error;
pub mod generate;
pub mod mixer;
pub mod oscillator;
pub mod percussion;
pub mod quantize;
pub mod rng;
pub mod sequencer;
pub mod wav;

// Re-export main types at crate root
pub use error::{RenderError, RenderResult};
pub use generate::{generate, generate_with_rng, generate_with_seed, render_track, GenerateResult};
pub use mixer::StereoBuffer;
pub use sequencer::{plan_step, StepGrid, StepPlan};
pub use wav::WavResult;
