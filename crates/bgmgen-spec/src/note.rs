//! Note names and frequency resolution.
//!
//! A note is either a rest or a pitch class plus octave. Pitches are resolved
//! relative to A4 = 440 Hz in twelve-tone equal temperament:
//!
//! ```text
//! semitones = 12 * (octave - 4) + offset(class)
//! frequency = 440 * 2^(semitones / 12)
//! ```
//!
//! Only flat spellings are recognized (`Db`, `Eb`, `Gb`, `Ab`, `Bb`).

use std::fmt;
use std::str::FromStr;

use crate::error::SpecError;

/// Reference pitch for A4 in Hz.
pub const A4_FREQUENCY: f64 = 440.0;

/// Reference octave of [`A4_FREQUENCY`].
pub const A4_OCTAVE: u8 = 4;

/// Tokens accepted as a rest.
pub const REST_TOKENS: &[&str] = &["-", "--", "---", "rest"];

/// One of the twelve recognized pitch classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    Db,
    D,
    Eb,
    E,
    F,
    Gb,
    G,
    Ab,
    A,
    Bb,
    B,
}

impl PitchClass {
    /// All pitch classes in ascending order from C.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Db,
        PitchClass::D,
        PitchClass::Eb,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Gb,
        PitchClass::G,
        PitchClass::Ab,
        PitchClass::A,
        PitchClass::Bb,
        PitchClass::B,
    ];

    /// Signed semitone offset from A within the same octave, in [-9, +2].
    pub fn offset(&self) -> i32 {
        match self {
            PitchClass::C => -9,
            PitchClass::Db => -8,
            PitchClass::D => -7,
            PitchClass::Eb => -6,
            PitchClass::E => -5,
            PitchClass::F => -4,
            PitchClass::Gb => -3,
            PitchClass::G => -2,
            PitchClass::Ab => -1,
            PitchClass::A => 0,
            PitchClass::Bb => 1,
            PitchClass::B => 2,
        }
    }

    /// Returns the token for this class (e.g. "Eb").
    pub fn as_str(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Db => "Db",
            PitchClass::D => "D",
            PitchClass::Eb => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Gb => "Gb",
            PitchClass::G => "G",
            PitchClass::Ab => "Ab",
            PitchClass::A => "A",
            PitchClass::Bb => "Bb",
            PitchClass::B => "B",
        }
    }

    /// Looks up a class by its exact token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == token)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single pattern entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Note {
    /// Silence for the step.
    #[default]
    Rest,
    /// A pitched note.
    Pitched {
        /// Pitch class.
        class: PitchClass,
        /// Octave number (A4 is octave 4).
        octave: u8,
    },
}

impl Note {
    /// Creates a pitched note.
    pub fn pitched(class: PitchClass, octave: u8) -> Self {
        Note::Pitched { class, octave }
    }

    /// Returns true for [`Note::Rest`].
    pub fn is_rest(&self) -> bool {
        matches!(self, Note::Rest)
    }

    /// Semitone distance from A4, or `None` for a rest.
    pub fn semitones_from_a4(&self) -> Option<i32> {
        match self {
            Note::Rest => None,
            Note::Pitched { class, octave } => {
                Some(12 * (*octave as i32 - A4_OCTAVE as i32) + class.offset())
            }
        }
    }

    /// Fundamental frequency in Hz; 0.0 for a rest.
    ///
    /// The octave factor is applied as an exact power of two so that raising
    /// a note by one octave doubles its frequency bit-for-bit.
    pub fn frequency(&self) -> f64 {
        match self {
            Note::Rest => 0.0,
            Note::Pitched { class, octave } => {
                let octave_factor = 2.0_f64.powi(*octave as i32 - A4_OCTAVE as i32);
                let class_factor = 2.0_f64.powf(class.offset() as f64 / 12.0);
                A4_FREQUENCY * octave_factor * class_factor
            }
        }
    }
}

/// Resolves a note to its frequency in Hz (0.0 for a rest).
///
/// # Example
/// ```
/// use bgmgen_spec::note::{resolve, Note, PitchClass};
///
/// assert_eq!(resolve(&Note::pitched(PitchClass::A, 4)), 440.0);
/// assert_eq!(resolve(&Note::Rest), 0.0);
/// ```
pub fn resolve(note: &Note) -> f64 {
    note.frequency()
}

impl FromStr for Note {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if REST_TOKENS.iter().any(|r| r.eq_ignore_ascii_case(s)) {
            return Ok(Note::Rest);
        }

        // Class is the leading letter plus an optional flat sign.
        let split = s
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit())
            .map(|(i, _)| i)
            .ok_or_else(|| SpecError::invalid_note(s))?;
        let (class_token, octave_token) = s.split_at(split);

        let class = PitchClass::from_token(class_token).ok_or_else(|| SpecError::invalid_note(s))?;
        if !octave_token.chars().all(|c| c.is_ascii_digit()) {
            return Err(SpecError::invalid_note(s));
        }
        let octave: u8 = octave_token
            .parse()
            .map_err(|_| SpecError::invalid_note(s))?;

        Ok(Note::Pitched { class, octave })
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::Rest => f.write_str("-"),
            Note::Pitched { class, octave } => write!(f, "{}{}", class, octave),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(token: &str) -> Note {
        token.parse().unwrap()
    }

    #[test]
    fn test_a4_is_exactly_440() {
        assert_eq!(resolve(&note("A4")), 440.0);
    }

    #[test]
    fn test_a5_is_exactly_880() {
        assert_eq!(resolve(&note("A5")), 880.0);
        assert_eq!(resolve(&note("A3")), 220.0);
    }

    #[test]
    fn test_rest_resolves_to_zero() {
        assert_eq!(resolve(&Note::Rest), 0.0);
        for token in REST_TOKENS {
            assert_eq!(resolve(&note(token)), 0.0);
        }
        assert_eq!(resolve(&note("REST")), 0.0);
    }

    #[test]
    fn test_octave_doubles_frequency_for_every_class() {
        for class in PitchClass::ALL {
            for octave in 0..9u8 {
                let low = Note::pitched(class, octave).frequency();
                let high = Note::pitched(class, octave + 1).frequency();
                assert_eq!(high, 2.0 * low, "{}{} -> {}{}", class, octave, class, octave + 1);
            }
        }
    }

    #[test]
    fn test_known_pitches() {
        // C4 (middle C) and C2 (the lowest bass reference)
        assert!((resolve(&note("C4")) - 261.6256).abs() < 1e-3);
        assert!((resolve(&note("C2")) - 65.4064).abs() < 1e-3);
        assert!((resolve(&note("Bb4")) - 466.1638).abs() < 1e-3);
        assert!((resolve(&note("B4")) - 493.8833).abs() < 1e-3);
    }

    #[test]
    fn test_semitone_distance() {
        assert_eq!(note("A4").semitones_from_a4(), Some(0));
        assert_eq!(note("C4").semitones_from_a4(), Some(-9));
        assert_eq!(note("B4").semitones_from_a4(), Some(2));
        assert_eq!(note("C2").semitones_from_a4(), Some(-33));
        assert_eq!(Note::Rest.semitones_from_a4(), None);
    }

    #[test]
    fn test_offsets_cover_minus_nine_to_two() {
        let offsets: Vec<i32> = PitchClass::ALL.iter().map(|c| c.offset()).collect();
        assert_eq!(offsets, (-9..=2).collect::<Vec<_>>());
    }

    #[test]
    fn test_parse_flats() {
        assert_eq!(note("Eb2"), Note::pitched(PitchClass::Eb, 2));
        assert_eq!(note("Gb4"), Note::pitched(PitchClass::Gb, 4));
        assert_eq!(note("B2"), Note::pitched(PitchClass::B, 2));
        assert_eq!(note("Bb2"), Note::pitched(PitchClass::Bb, 2));
    }

    #[test]
    fn test_parse_rejects_unknown_tokens() {
        for bad in ["", "H4", "C#4", "Cb4", "eb4", "E", "4", "Eb", "C4x", "C-1", "Ebb4", " C4", "C 4"] {
            let err = bad.parse::<Note>().unwrap_err();
            match err {
                SpecError::InvalidNoteName { token, path } => {
                    assert_eq!(token, bad);
                    assert!(path.is_none());
                }
                other => panic!("unexpected error for {:?}: {}", bad, other),
            }
        }
    }

    #[test]
    fn test_display_round_trips() {
        for class in PitchClass::ALL {
            let n = Note::pitched(class, 3);
            assert_eq!(n.to_string().parse::<Note>().unwrap(), n);
        }
        assert_eq!(Note::Rest.to_string(), "-");
    }
}
