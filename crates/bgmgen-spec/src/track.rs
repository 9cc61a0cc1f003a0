//! Track spec types and JSON documents.

use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::hash::derive_name_seed;
use crate::note::Note;
use crate::pattern::Pattern;

/// Output sample rate for every rendered track, in Hz.
pub const SAMPLE_RATE: u32 = 44100;

/// Steps per beat (a sixteenth-note grid).
pub const STEPS_PER_BEAT: u32 = 4;

/// Default complexity when a document omits it.
pub const DEFAULT_COMPLEXITY: u32 = 1;

/// Default intensity when a document omits it.
pub const DEFAULT_INTENSITY: f64 = 1.0;

/// A complete description of one background-music track.
///
/// Specs are plain values: they are constructed once (from JSON or the
/// builder), validated with [`crate::validation::validate_track`], and then
/// only read by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrackDocument", into = "TrackDocument")]
pub struct TrackSpec {
    /// Output identifier; the rendered file is `<output_name>.wav`.
    pub output_name: String,
    /// Tempo in beats per minute.
    pub tempo_bpm: f64,
    /// Total duration in seconds.
    pub duration_seconds: f64,
    /// Bass line, one note per step.
    pub bass_pattern: Pattern,
    /// Lead line, one note per step.
    pub melody_pattern: Pattern,
    /// Percussion density, 1..=8.
    pub complexity: u32,
    /// Global volume multiplier.
    pub intensity: f64,
    /// Boss tracks start the melody immediately, play it percussively, and
    /// add hi-hats.
    pub boss_mode: bool,
    /// RNG seed for noise percussion. Derived from `output_name` when absent.
    pub seed: Option<u32>,
    /// Human-readable description.
    pub description: Option<String>,
}

impl TrackSpec {
    /// Creates a new track builder.
    pub fn builder(output_name: impl Into<String>) -> TrackSpecBuilder {
        TrackSpecBuilder::new(output_name)
    }

    /// Parses a track from a JSON string.
    ///
    /// Note tokens are resolved here, so an unknown token fails with
    /// [`SpecError::InvalidNoteName`] carrying the JSON path of the token.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let doc: TrackDocument = serde_json::from_str(json)?;
        doc.into_track()
    }

    /// Parses a track from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SpecError> {
        let doc: TrackDocument = serde_json::from_value(value)?;
        doc.into_track()
    }

    /// Serializes the track to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the track to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Duration of one beat in seconds.
    pub fn beat_duration(&self) -> f64 {
        60.0 / self.tempo_bpm
    }

    /// Duration of one sixteenth-note step in seconds.
    pub fn step_duration(&self) -> f64 {
        self.beat_duration() / STEPS_PER_BEAT as f64
    }

    /// The seed used for noise generation.
    pub fn effective_seed(&self) -> u32 {
        self.seed
            .unwrap_or_else(|| derive_name_seed(&self.output_name))
    }

    /// Output file name for this track.
    pub fn file_name(&self) -> String {
        format!("{}.wav", self.output_name)
    }
}

/// Builder for [`TrackSpec`].
#[derive(Debug, Clone)]
pub struct TrackSpecBuilder {
    spec: TrackSpec,
}

impl TrackSpecBuilder {
    /// Creates a builder with a 120 BPM, 16 second, empty-pattern track.
    pub fn new(output_name: impl Into<String>) -> Self {
        Self {
            spec: TrackSpec {
                output_name: output_name.into(),
                tempo_bpm: 120.0,
                duration_seconds: 16.0,
                bass_pattern: Pattern::default(),
                melody_pattern: Pattern::default(),
                complexity: DEFAULT_COMPLEXITY,
                intensity: DEFAULT_INTENSITY,
                boss_mode: false,
                seed: None,
                description: None,
            },
        }
    }

    /// Sets the tempo in BPM.
    pub fn tempo(mut self, bpm: f64) -> Self {
        self.spec.tempo_bpm = bpm;
        self
    }

    /// Sets the duration in seconds.
    pub fn duration(mut self, seconds: f64) -> Self {
        self.spec.duration_seconds = seconds;
        self
    }

    /// Sets the bass pattern.
    pub fn bass(mut self, pattern: Pattern) -> Self {
        self.spec.bass_pattern = pattern;
        self
    }

    /// Sets the melody pattern.
    pub fn melody(mut self, pattern: Pattern) -> Self {
        self.spec.melody_pattern = pattern;
        self
    }

    /// Sets the percussion complexity.
    pub fn complexity(mut self, complexity: u32) -> Self {
        self.spec.complexity = complexity;
        self
    }

    /// Sets the intensity.
    pub fn intensity(mut self, intensity: f64) -> Self {
        self.spec.intensity = intensity;
        self
    }

    /// Enables or disables boss mode.
    pub fn boss(mut self, boss_mode: bool) -> Self {
        self.spec.boss_mode = boss_mode;
        self
    }

    /// Sets an explicit seed.
    pub fn seed(mut self, seed: u32) -> Self {
        self.spec.seed = Some(seed);
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.spec.description = Some(description.into());
        self
    }

    /// Builds the track.
    pub fn build(self) -> TrackSpec {
        self.spec
    }
}

/// A note as written in a JSON document.
///
/// Accepts a token string, `null`, or the number zero, the last two meaning
/// a rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteToken {
    /// A token string or `null`.
    Name(Option<String>),
    /// A bare number; only zero (`0` or `0.0`) is meaningful.
    Number(f64),
}

impl NoteToken {
    fn into_note(self, path: impl FnOnce() -> String) -> Result<Note, SpecError> {
        match self {
            NoteToken::Name(None) => Ok(Note::Rest),
            NoteToken::Number(n) if n == 0.0 => Ok(Note::Rest),
            NoteToken::Name(Some(token)) => token.parse().map_err(|e: SpecError| e.at(path())),
            NoteToken::Number(n) => Err(SpecError::invalid_note(n.to_string()).at(path())),
        }
    }
}

impl From<&Note> for NoteToken {
    fn from(note: &Note) -> Self {
        NoteToken::Name(Some(note.to_string()))
    }
}

/// On-disk form of a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackDocument {
    pub output_name: String,
    pub tempo_bpm: f64,
    pub duration_seconds: f64,
    pub bass_pattern: Vec<NoteToken>,
    pub melody_pattern: Vec<NoteToken>,
    #[serde(default = "default_complexity")]
    pub complexity: u32,
    #[serde(default = "default_intensity")]
    pub intensity: f64,
    #[serde(default)]
    pub boss_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_complexity() -> u32 {
    DEFAULT_COMPLEXITY
}

fn default_intensity() -> f64 {
    DEFAULT_INTENSITY
}

fn resolve_tokens(tokens: Vec<NoteToken>, field: &str) -> Result<Pattern, SpecError> {
    tokens
        .into_iter()
        .enumerate()
        .map(|(i, t)| t.into_note(|| format!("{}[{}]", field, i)))
        .collect::<Result<Vec<_>, _>>()
        .map(Pattern::new)
}

impl TrackDocument {
    /// Resolves every note token, producing a typed track.
    pub fn into_track(self) -> Result<TrackSpec, SpecError> {
        let bass_pattern = resolve_tokens(self.bass_pattern, "bass_pattern")?;
        let melody_pattern = resolve_tokens(self.melody_pattern, "melody_pattern")?;

        Ok(TrackSpec {
            output_name: self.output_name,
            tempo_bpm: self.tempo_bpm,
            duration_seconds: self.duration_seconds,
            bass_pattern,
            melody_pattern,
            complexity: self.complexity,
            intensity: self.intensity,
            boss_mode: self.boss_mode,
            seed: self.seed,
            description: self.description,
        })
    }
}

impl TryFrom<TrackDocument> for TrackSpec {
    type Error = SpecError;

    fn try_from(doc: TrackDocument) -> Result<Self, Self::Error> {
        doc.into_track()
    }
}

impl From<TrackSpec> for TrackDocument {
    fn from(spec: TrackSpec) -> Self {
        Self {
            output_name: spec.output_name,
            tempo_bpm: spec.tempo_bpm,
            duration_seconds: spec.duration_seconds,
            bass_pattern: spec.bass_pattern.notes().iter().map(NoteToken::from).collect(),
            melody_pattern: spec.melody_pattern.notes().iter().map(NoteToken::from).collect(),
            complexity: spec.complexity,
            intensity: spec.intensity,
            boss_mode: spec.boss_mode,
            seed: spec.seed,
            description: spec.description,
        }
    }
}

/// One entry of a loaded track set.
///
/// Each entry keeps its own parse outcome so that a malformed track does not
/// prevent the rest of the set from rendering.
#[derive(Debug)]
pub struct LoadedTrack {
    /// Index within the set.
    pub index: usize,
    /// `output_name` if the entry had one, otherwise `tracks[<index>]`.
    pub label: String,
    /// The parsed track or the reason it could not be parsed.
    pub track: Result<TrackSpec, SpecError>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TrackSetDocument {
    tracks: Vec<serde_json::Value>,
}

/// A soundtrack: several tracks rendered as one batch.
#[derive(Debug)]
pub struct TrackSet {
    /// Entries in document order.
    pub entries: Vec<LoadedTrack>,
}

impl TrackSet {
    /// Builds a set from already-constructed tracks.
    pub fn new(tracks: Vec<TrackSpec>) -> Self {
        let entries = tracks
            .into_iter()
            .enumerate()
            .map(|(index, track)| LoadedTrack {
                index,
                label: track.output_name.clone(),
                track: Ok(track),
            })
            .collect();
        Self { entries }
    }

    /// Parses a `{ "tracks": [...] }` document.
    ///
    /// Fails only if the envelope itself is malformed; per-track problems are
    /// recorded in the corresponding [`LoadedTrack`].
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let doc: TrackSetDocument = serde_json::from_str(json)?;
        let entries = doc
            .tracks
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let label = value
                    .get("output_name")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("tracks[{}]", index));
                let track = TrackSpec::from_value(value);
                if let Err(ref e) = track {
                    tracing::warn!(track = %label, error = %e, "track failed to load");
                }
                LoadedTrack {
                    index,
                    label,
                    track,
                }
            })
            .collect();
        Ok(Self { entries })
    }

    /// Number of entries, including ones that failed to parse.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Successfully parsed tracks.
    pub fn tracks(&self) -> impl Iterator<Item = &TrackSpec> {
        self.entries.iter().filter_map(|e| e.track.as_ref().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::PitchClass;
    use pretty_assertions::assert_eq;

    const STAGE1: &str = r#"{
        "output_name": "stage1",
        "tempo_bpm": 130,
        "duration_seconds": 16,
        "complexity": 1,
        "intensity": 0.8,
        "bass_pattern": ["C2", 0, "C3", 0, "C2", 0, "Eb2", "F2"],
        "melody_pattern": ["C4", "Eb4", "G4", "C5", "G4", "Eb4", "C4", "G3"]
    }"#;

    #[test]
    fn test_from_json_resolves_notes() {
        let track = TrackSpec::from_json(STAGE1).unwrap();
        assert_eq!(track.output_name, "stage1");
        assert_eq!(track.tempo_bpm, 130.0);
        assert_eq!(track.bass_pattern.len(), 8);
        assert_eq!(track.bass_pattern.note_at(1), Some(Note::Rest));
        assert_eq!(
            track.bass_pattern.note_at(6),
            Some(Note::pitched(PitchClass::Eb, 2))
        );
        assert!(!track.boss_mode);
        assert_eq!(track.seed, None);
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let json = r#"{
            "output_name": "minimal",
            "tempo_bpm": 120,
            "duration_seconds": 2,
            "bass_pattern": ["C2"],
            "melody_pattern": [null, "rest"]
        }"#;
        let track = TrackSpec::from_json(json).unwrap();
        assert_eq!(track.complexity, DEFAULT_COMPLEXITY);
        assert_eq!(track.intensity, DEFAULT_INTENSITY);
        assert!(!track.boss_mode);
        assert_eq!(track.melody_pattern.pitched_count(), 0);
    }

    #[test]
    fn test_invalid_note_carries_path() {
        let json = STAGE1.replace("\"G3\"", "\"G#3\"");
        let err = TrackSpec::from_json(&json).unwrap_err();
        match err {
            SpecError::InvalidNoteName { token, path } => {
                assert_eq!(token, "G#3");
                assert_eq!(path.as_deref(), Some("melody_pattern[7]"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_nonzero_number_is_invalid_note() {
        let json = STAGE1.replace("\"C3\", 0", "\"C3\", 7");
        let err = TrackSpec::from_json(&json).unwrap_err();
        assert!(matches!(err, SpecError::InvalidNoteName { ref token, .. } if token == "7"));
    }

    #[test]
    fn test_float_numbers_as_notes() {
        let json = STAGE1.replace("\"C3\", 0", "\"C3\", 0.0");
        let track = TrackSpec::from_json(&json).unwrap();
        assert_eq!(track.bass_pattern.note_at(3), Some(Note::Rest));

        let json = STAGE1.replace("\"C3\", 0", "\"C3\", 2.5");
        match TrackSpec::from_json(&json).unwrap_err() {
            SpecError::InvalidNoteName { token, path } => {
                assert_eq!(token, "2.5");
                assert_eq!(path.as_deref(), Some("bass_pattern[3]"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = STAGE1.replace("\"complexity\"", "\"complexityy\"");
        assert!(matches!(
            TrackSpec::from_json(&json),
            Err(SpecError::JsonParse(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let track = TrackSpec::from_json(STAGE1).unwrap();
        let json = track.to_json_pretty().unwrap();
        let parsed = TrackSpec::from_json(&json).unwrap();
        assert_eq!(track, parsed);
    }

    #[test]
    fn test_step_duration() {
        let track = TrackSpec::builder("grid").tempo(120.0).build();
        assert_eq!(track.beat_duration(), 0.5);
        assert_eq!(track.step_duration(), 0.125);
    }

    #[test]
    fn test_effective_seed_prefers_explicit() {
        let implicit = TrackSpec::builder("stage1").build();
        let explicit = TrackSpec::builder("stage1").seed(7).build();
        assert_eq!(explicit.effective_seed(), 7);
        assert_eq!(implicit.effective_seed(), derive_name_seed("stage1"));
        assert_eq!(implicit.effective_seed(), implicit.clone().effective_seed());
    }

    #[test]
    fn test_track_set_isolates_bad_entries() {
        let json = format!(
            r#"{{ "tracks": [ {}, {{ "output_name": "broken", "tempo_bpm": 120 }}, {} ] }}"#,
            STAGE1,
            STAGE1.replace("stage1", "stage1b").replace("\"F2\"", "\"Q2\"")
        );
        let set = TrackSet::from_json(&json).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.entries[0].track.is_ok());
        assert_eq!(set.entries[1].label, "broken");
        assert!(matches!(set.entries[1].track, Err(SpecError::JsonParse(_))));
        assert!(matches!(
            set.entries[2].track,
            Err(SpecError::InvalidNoteName { .. })
        ));
        assert_eq!(set.tracks().count(), 1);
    }

    #[test]
    fn test_track_set_envelope_must_be_valid() {
        assert!(TrackSet::from_json("[]").is_err());
        assert!(TrackSet::from_json(r#"{ "songs": [] }"#).is_err());
    }
}
