//! bgmgen Track Spec Library
//!
//! This crate provides types, validation, and hashing for bgmgen track specs.
//! A track spec is a compact JSON document describing one looping
//! background-music track: tempo, duration, a bass and a melody pattern,
//! percussion complexity, intensity, and a boss-mode flag.
//!
//! # Example
//!
//! ```
//! use bgmgen_spec::{Pattern, TrackSpec};
//! use bgmgen_spec::validation::validate_track;
//! use bgmgen_spec::hash::canonical_track_hash;
//!
//! let track = TrackSpec::builder("stage1")
//!     .tempo(130.0)
//!     .duration(16.0)
//!     .complexity(1)
//!     .intensity(0.8)
//!     .bass(Pattern::parse(&["C2", "-", "C3", "-", "C2", "-", "Eb2", "F2"]).unwrap())
//!     .melody(Pattern::parse(&["C4", "Eb4", "G4", "C5", "G4", "Eb4", "C4", "G3"]).unwrap())
//!     .build();
//!
//! assert!(validate_track(&track).is_ok());
//!
//! let hash = canonical_track_hash(&track).unwrap();
//! println!("Track hash: {}", hash);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning types for validation
//! - [`note`]: Note names and frequency resolution
//! - [`pattern`]: Cyclic note patterns
//! - [`track`]: Track spec, builder, and track sets
//! - [`validation`]: Track validation functions
//! - [`hash`]: Canonical hashing and seed derivation

pub mod error;
pub mod hash;
pub mod note;
pub mod pattern;
pub mod track;
pub mod validation;

// Re-export commonly used types at the crate root
pub use error::{
    ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
pub use hash::{canonical_track_hash, derive_name_seed};
pub use note::{resolve, Note, PitchClass, A4_FREQUENCY};
pub use pattern::Pattern;
pub use track::{
    LoadedTrack, TrackSet, TrackSpec, TrackSpecBuilder, SAMPLE_RATE, STEPS_PER_BEAT,
};
pub use validation::{is_valid_output_name, validate_track, validate_track_set, MAX_COMPLEXITY};
