//! Cyclic note patterns.

use crate::error::SpecError;
use crate::note::Note;

/// An ordered, cyclic sequence of notes consumed one per step.
///
/// Step `s` reads index `s mod len`. Bass and melody patterns may have
/// different lengths. An empty pattern is representable so that documents can
/// be loaded and reported on, but it fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
    notes: Vec<Note>,
}

impl Pattern {
    /// Creates a pattern from notes.
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    /// Parses a pattern from note tokens.
    ///
    /// # Example
    /// ```
    /// use bgmgen_spec::Pattern;
    ///
    /// let bass = Pattern::parse(&["C2", "-", "C3", "-"]).unwrap();
    /// assert_eq!(bass.len(), 4);
    /// assert!(bass.note_at(5).unwrap().is_rest());
    /// ```
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, SpecError> {
        let notes = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| {
                t.as_ref()
                    .parse::<Note>()
                    .map_err(|e| e.at(format!("[{}]", i)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { notes })
    }

    /// Number of entries in one cycle.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Returns true if the pattern has no entries.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// The note sounding at `step`, wrapping around the pattern length.
    ///
    /// Returns `None` only for an empty pattern.
    pub fn note_at(&self, step: usize) -> Option<Note> {
        if self.notes.is_empty() {
            return None;
        }
        self.notes.get(step % self.notes.len()).copied()
    }

    /// The notes of one cycle.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Number of pitched (non-rest) entries.
    pub fn pitched_count(&self) -> usize {
        self.notes.iter().filter(|n| !n.is_rest()).count()
    }
}

impl From<Vec<Note>> for Pattern {
    fn from(notes: Vec<Note>) -> Self {
        Self::new(notes)
    }
}

impl FromIterator<Note> for Pattern {
    fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::PitchClass;

    #[test]
    fn test_note_at_wraps() {
        let p = Pattern::parse(&["C2", "Eb2", "Gb2"]).unwrap();
        assert_eq!(p.note_at(0), Some(Note::pitched(PitchClass::C, 2)));
        assert_eq!(p.note_at(3), Some(Note::pitched(PitchClass::C, 2)));
        assert_eq!(p.note_at(7), Some(Note::pitched(PitchClass::Eb, 2)));
    }

    #[test]
    fn test_empty_pattern_has_no_notes() {
        let p = Pattern::default();
        assert!(p.is_empty());
        assert_eq!(p.note_at(0), None);
        assert_eq!(p.note_at(17), None);
    }

    #[test]
    fn test_parse_reports_index() {
        let err = Pattern::parse(&["C2", "-", "X9"]).unwrap_err();
        assert_eq!(err.to_string(), "invalid note name 'X9' (at [2])");
    }
}
