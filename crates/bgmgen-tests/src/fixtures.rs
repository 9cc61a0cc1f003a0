//! Track fixtures shared by the integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use bgmgen_spec::{Pattern, TrackSpec};
use tempfile::TempDir;

/// Path to the shipped soundtrack document.
pub fn soundtrack_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tracks")
        .join("soundtrack.json")
}

/// JSON for a short track with the given name and tempo.
pub fn track_json(name: &str, tempo_bpm: f64, duration_seconds: f64) -> String {
    format!(
        r#"{{
    "output_name": "{}",
    "tempo_bpm": {},
    "duration_seconds": {},
    "bass_pattern": ["C2", "-", "C3", "-", "C2", "-", "Eb2", "F2"],
    "melody_pattern": ["C4", "Eb4", "G4", "C5", "G4", "Eb4", "C4", "G3"],
    "complexity": 2,
    "intensity": 0.9
}}"#,
        name, tempo_bpm, duration_seconds
    )
}

/// A short boss track: immediate melody, kicks and hi-hats.
pub fn boss_track(duration_seconds: f64) -> TrackSpec {
    TrackSpec::builder("boss")
        .tempo(180.0)
        .duration(duration_seconds)
        .complexity(1)
        .intensity(1.2)
        .boss(true)
        .bass(Pattern::parse(&["C2", "Eb2", "Gb2", "A2"]).unwrap())
        .melody(Pattern::parse(&["C5", "A4", "Gb4", "Eb4", "C4", "Eb4", "Gb4", "A4"]).unwrap())
        .build()
}

/// A temporary directory with track documents in it.
pub struct TrackFixture {
    dir: TempDir,
}

impl TrackFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create fixture dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` to `name` and returns its path as a string.
    pub fn write(&self, name: &str, content: &str) -> String {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture subdir");
        }
        fs::write(&path, content).expect("Failed to write fixture");
        path.to_string_lossy().into_owned()
    }

    /// Output directory inside the fixture.
    pub fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }
}

impl Default for TrackFixture {
    fn default() -> Self {
        Self::new()
    }
}
