//! Shared helpers for rendering tracks and reporting outcomes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bgmgen_backend::{generate, generate_with_seed, GenerateResult, RenderError};
use bgmgen_spec::{ValidationError, ValidationWarning};
use colored::Colorize;

use super::json_output::{JsonError, JsonWarning};
use crate::output::write_atomic;

/// Default output directory.
pub(crate) const DEFAULT_OUT_ROOT: &str = ".";

/// Exit code for spec and validation failures.
pub(crate) const EXIT_SPEC_ERROR: u8 = 1;

/// Exit code for render and I/O failures.
pub(crate) const EXIT_RENDER_ERROR: u8 = 2;

/// A track rendered and written to disk.
pub(crate) struct Rendered {
    pub result: GenerateResult,
    pub path: PathBuf,
}

/// Renders `track` and writes `<output_name>.wav` into `out_dir`.
///
/// `seed` overrides the track's effective seed.
pub(crate) fn render_to_dir(
    track: &bgmgen_spec::TrackSpec,
    seed: Option<u32>,
    out_dir: &Path,
) -> Result<Rendered, RenderError> {
    let result = match seed {
        Some(seed) => generate_with_seed(track, seed)?,
        None => generate(track)?,
    };
    let path = write_atomic(out_dir, &track.file_name(), &result.wav.wav_data)?;
    Ok(Rendered { result, path })
}

/// Exit code for a render failure.
pub(crate) fn render_exit_code(error: &RenderError) -> u8 {
    match error {
        RenderError::InvalidSpec { .. } => EXIT_SPEC_ERROR,
        _ => EXIT_RENDER_ERROR,
    }
}

pub(crate) fn exit(code: u8) -> ExitCode {
    ExitCode::from(code)
}

/// True if `path` points at or below `tracks[index]`.
pub(crate) fn belongs_to_entry(path: Option<&str>, index: usize) -> bool {
    let Some(path) = path else {
        return false;
    };
    let prefix = format!("tracks[{}]", index);
    match path.strip_prefix(&prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

pub(crate) fn print_errors(errors: &[JsonError]) {
    for error in errors {
        let location = error
            .path
            .as_ref()
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();
        println!(
            "  {} [{}]{}: {}",
            "x".red(),
            error.code,
            location.dimmed(),
            error.message
        );
    }
}

pub(crate) fn print_warnings(warnings: &[JsonWarning]) {
    for warning in warnings {
        let location = warning
            .path
            .as_ref()
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();
        println!(
            "  {} [{}]{}: {}",
            "!".yellow(),
            warning.code,
            location.dimmed(),
            warning.message
        );
    }
}

pub(crate) fn errors_to_json(errors: &[ValidationError]) -> Vec<JsonError> {
    errors
        .iter()
        .map(super::json_output::validation_error_to_json)
        .collect()
}

pub(crate) fn warnings_to_json(warnings: &[ValidationWarning]) -> Vec<JsonWarning> {
    warnings
        .iter()
        .map(super::json_output::validation_warning_to_json)
        .collect()
}
