//! JSON output types for machine-readable CLI output.
//!
//! Every command accepts `--json`; in that mode nothing colored is printed
//! and stdout carries exactly one of the documents defined here.

use anyhow::{Context, Result};
use bgmgen_backend::{GenerateResult, RenderError};
use bgmgen_spec::{ValidationError, ValidationWarning};
use serde::{Deserialize, Serialize};

use crate::input::InputError;

/// Error codes for CLI-level failures.
///
/// Validation problems pass through their own `E0xx` codes and render
/// failures their `BGM_0xx` codes.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Unknown file extension
    pub const UNKNOWN_EXTENSION: &str = "CLI_002";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_003";
    /// Document kind not accepted by the command
    pub const WRONG_DOCUMENT: &str = "CLI_004";
}

/// A structured error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g. "CLI_001", "E001", "BGM_002")
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// JSON path to the offending field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Source file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// A structured warning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

pub fn validation_error_to_json(error: &ValidationError) -> JsonError {
    JsonError {
        code: error.code.code().to_string(),
        message: error.message.clone(),
        path: error.path.clone(),
        file: None,
    }
}

pub fn validation_warning_to_json(warning: &ValidationWarning) -> JsonWarning {
    JsonWarning {
        code: warning.code.code().to_string(),
        message: warning.message.clone(),
        path: warning.path.clone(),
    }
}

pub fn input_error_to_json(error: &InputError, file: &str) -> JsonError {
    JsonError::new(error.code(), error.to_string()).with_file(file)
}

/// Render failures expand to their validation errors when there are any.
pub fn render_error_to_json(error: &RenderError) -> Vec<JsonError> {
    if error.validation_errors().is_empty() {
        vec![JsonError::new(error.code(), error.to_string())]
    } else {
        error
            .validation_errors()
            .iter()
            .map(validation_error_to_json)
            .collect()
    }
}

/// Output of `validate --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOutput {
    pub success: bool,
    /// "track" or "track_set"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// BLAKE3 hash of the source file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    /// Number of tracks checked
    pub tracks: usize,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
}

/// One rendered track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackOutput {
    pub output_name: String,
    /// Path of the written WAV file
    pub path: String,
    pub frames: usize,
    pub duration_seconds: f64,
    pub total_steps: usize,
    pub samples_per_step: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    /// BLAKE3 hash of the PCM data
    pub pcm_hash: String,
    /// Canonical BLAKE3 hash of the track spec
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_hash: Option<String>,
    pub clipped_samples: usize,
}

impl TrackOutput {
    pub fn new(
        output_name: &str,
        path: &str,
        result: &GenerateResult,
        track_hash: Option<String>,
    ) -> Self {
        Self {
            output_name: output_name.to_string(),
            path: path.to_string(),
            frames: result.wav.num_frames,
            duration_seconds: result.wav.duration_seconds(),
            total_steps: result.total_steps,
            samples_per_step: result.samples_per_step,
            seed: result.seed,
            pcm_hash: result.wav.pcm_hash.clone(),
            track_hash,
            clipped_samples: result.clipped_samples,
        }
    }
}

/// Output of `generate --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<TrackOutput>,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
}

impl GenerateOutput {
    pub fn failure(errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: false,
            output: None,
            errors,
            warnings,
        }
    }
}

/// Per-track entry of `generate-all --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchTrackResult {
    /// Output name, or a positional label if the track did not parse
    pub label: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<TrackOutput>,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    pub duration_ms: u64,
}

/// Output of `generate-all --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    pub success: bool,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub tracks: Vec<BatchTrackResult>,
    /// Failures that prevented the batch from loading at all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}

impl BatchOutput {
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            total: 0,
            succeeded: 0,
            failed: 0,
            tracks: Vec::new(),
            errors,
        }
    }
}

/// One voice in `plan --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanVoice {
    /// "bass", "melody", "kick", "snare" or "hihat"
    pub voice: String,
    /// Note name for pattern voices
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Tone frequency in Hz; absent for noise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    /// Envelope name, or "burst" for noise
    pub envelope: String,
    pub volume: f64,
    pub step_fraction: f64,
}

/// One step in `plan --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanStepOutput {
    pub step: usize,
    pub start_frame: usize,
    pub voices: Vec<PlanVoice>,
}

/// Output of `plan --json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOutput {
    pub success: bool,
    pub output_name: String,
    pub step_duration: f64,
    pub samples_per_step: usize,
    pub total_steps: usize,
    pub steps: Vec<PlanStepOutput>,
    pub errors: Vec<JsonError>,
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON output")?;
    println!("{}", json);
    Ok(())
}
