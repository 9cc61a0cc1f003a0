//! Loading track documents from disk.
//!
//! A document is either a single track object or a `{ "tracks": [...] }`
//! track set. Batch loading additionally accepts a directory, in which case
//! every `.json` file below it contributes its tracks.

use std::path::{Path, PathBuf};

use bgmgen_spec::{LoadedTrack, SpecError, TrackSet, TrackSpec};
use walkdir::WalkDir;

use crate::commands::json_output::error_codes;

/// Recognized document extensions.
pub const JSON_EXTENSIONS: &[&str] = &["json"];

/// Error loading a document.
#[derive(Debug)]
pub enum InputError {
    /// File or directory could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File does not have a recognized extension.
    UnknownExtension { extension: Option<String> },
    /// Document parsed as JSON but is not a valid track or track set.
    Spec { path: PathBuf, source: SpecError },
}

impl InputError {
    /// Stable code for JSON output.
    ///
    /// Note-name failures surface as their validation code so they read the
    /// same as in `validate` reports.
    pub fn code(&self) -> &'static str {
        match self {
            InputError::FileRead { .. } => error_codes::FILE_READ,
            InputError::UnknownExtension { .. } => error_codes::UNKNOWN_EXTENSION,
            InputError::Spec { source, .. } => match source.code() {
                Some(code) => code.code(),
                None => error_codes::JSON_PARSE,
            },
        }
    }

    /// Converts into a spec error for recording against a batch entry.
    pub fn into_spec_error(self) -> SpecError {
        match self {
            InputError::FileRead { source, .. } => SpecError::Io(source),
            InputError::Spec { source, .. } => source,
            other @ InputError::UnknownExtension { .. } => SpecError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                other.to_string(),
            )),
        }
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read '{}': {}", path.display(), source)
            }
            InputError::UnknownExtension { extension } => match extension {
                Some(ext) => write!(f, "unknown file extension '.{}' (expected .json)", ext),
                None => write!(f, "missing file extension (expected .json)"),
            },
            InputError::Spec { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            InputError::Spec { source, .. } => Some(source),
            InputError::UnknownExtension { .. } => None,
        }
    }
}

/// A parsed document.
#[derive(Debug)]
pub enum Document {
    /// A single track object.
    Track(TrackSpec),
    /// A `{ "tracks": [...] }` set.
    Set(TrackSet),
}

impl Document {
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Track(_) => "track",
            Document::Set(_) => "track_set",
        }
    }

    /// Views the document as a set; a single track becomes a one-entry set.
    pub fn into_set(self) -> TrackSet {
        match self {
            Document::Track(track) => TrackSet::new(vec![track]),
            Document::Set(set) => set,
        }
    }
}

/// Result of loading a document.
#[derive(Debug)]
pub struct LoadResult {
    pub document: Document,
    /// BLAKE3 hash of the raw file contents.
    pub source_hash: String,
}

fn check_extension(path: &Path) -> Result<(), InputError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase());
    match extension.as_deref() {
        Some(ext) if JSON_EXTENSIONS.contains(&ext) => Ok(()),
        _ => Err(InputError::UnknownExtension { extension }),
    }
}

/// Loads a single document.
///
/// The presence of a top-level `tracks` key selects the track-set form.
pub fn load_document(path: &Path) -> Result<LoadResult, InputError> {
    check_extension(path)?;

    let content = std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let source_hash = blake3::hash(content.as_bytes()).to_hex().to_string();

    let spec_err = |source: SpecError| InputError::Spec {
        path: path.to_path_buf(),
        source,
    };

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| spec_err(SpecError::from(e)))?;
    let document = if value.get("tracks").is_some() {
        Document::Set(TrackSet::from_json(&content).map_err(spec_err)?)
    } else {
        Document::Track(TrackSpec::from_value(value).map_err(spec_err)?)
    };

    tracing::debug!(path = %path.display(), kind = document.kind(), "loaded document");

    Ok(LoadResult {
        document,
        source_hash,
    })
}

/// Lists every `.json` file under `dir`, sorted for a stable batch order.
pub fn collect_track_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// Loads every track reachable from `path` as one batch.
///
/// `path` may be a track file, a track-set file, or a directory of either.
/// In directory mode a file that fails to load becomes a failed entry
/// labelled with its file name, so the rest of the batch still renders.
pub fn load_batch(path: &Path) -> Result<TrackSet, InputError> {
    if !path.is_dir() {
        return Ok(load_document(path)?.document.into_set());
    }

    let mut entries: Vec<LoadedTrack> = Vec::new();
    for file in collect_track_files(path) {
        match load_document(&file) {
            Ok(result) => {
                for entry in result.document.into_set().entries {
                    entries.push(entry);
                }
            }
            Err(e) => {
                tracing::warn!(path = %file.display(), error = %e, "skipping unreadable document");
                let label = file
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.display().to_string());
                entries.push(LoadedTrack {
                    index: 0,
                    label,
                    track: Err(e.into_spec_error()),
                });
            }
        }
    }

    for (index, entry) in entries.iter_mut().enumerate() {
        entry.index = index;
    }

    Ok(TrackSet { entries })
}
