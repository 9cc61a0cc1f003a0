//! Generate-all command implementation
//!
//! Renders every track of a soundtrack. Each track stands alone: one that
//! fails to parse, validate, or render is reported and the rest still run.

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use bgmgen_spec::{canonical_track_hash, validate_track_set, LoadedTrack, ValidationResult};
use colored::Colorize;

use super::json_output::{
    error_codes, input_error_to_json, print_json, render_error_to_json, BatchOutput,
    BatchTrackResult, JsonError, JsonWarning, TrackOutput,
};
use super::reporting::{
    self, belongs_to_entry, DEFAULT_OUT_ROOT, EXIT_RENDER_ERROR, EXIT_SPEC_ERROR,
};
use crate::input::{load_batch, InputError};

/// Run the generate-all command
///
/// # Arguments
/// * `tracks_path` - Track-set file, single track file, or directory of either
/// * `out_root` - Output directory (default: current directory)
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if every track rendered, 2 if any render failed, 1 otherwise
pub fn run(tracks_path: &str, out_root: Option<&str>, json_output: bool) -> Result<ExitCode> {
    let out_root = out_root.unwrap_or(DEFAULT_OUT_ROOT);

    if !json_output {
        println!("{} {}", "Generating soundtrack:".cyan().bold(), tracks_path);
    }

    let (output, code) = match execute(Path::new(tracks_path), Path::new(out_root)) {
        Ok(result) => result,
        Err(e) => {
            let error = input_error_to_json(&e, tracks_path);
            if json_output {
                print_json(&BatchOutput::failure(vec![error]))?;
            } else {
                reporting::print_errors(&[error]);
            }
            return Ok(reporting::exit(EXIT_SPEC_ERROR));
        }
    };

    if json_output {
        print_json(&output)?;
    } else {
        print_human(&output);
    }

    Ok(reporting::exit(code))
}

/// Renders a whole batch.
///
/// Only a failure to read `tracks_path` itself is returned as an error.
pub fn execute(tracks_path: &Path, out_root: &Path) -> Result<(BatchOutput, u8), InputError> {
    let set = load_batch(tracks_path)?;
    let validation = validate_track_set(&set);

    let mut render_failed = false;
    let tracks: Vec<BatchTrackResult> = set
        .entries
        .iter()
        .map(|entry| {
            let result = render_entry(entry, &validation, out_root);
            if result.1 {
                render_failed = true;
            }
            result.0
        })
        .collect();

    let succeeded = tracks.iter().filter(|t| t.success).count();
    let failed = tracks.len() - succeeded;
    let code = if failed == 0 {
        0
    } else if render_failed {
        EXIT_RENDER_ERROR
    } else {
        EXIT_SPEC_ERROR
    };

    tracing::info!(total = tracks.len(), succeeded, failed, "batch finished");

    Ok((
        BatchOutput {
            success: failed == 0,
            total: tracks.len(),
            succeeded,
            failed,
            tracks,
            errors: Vec::new(),
        },
        code,
    ))
}

/// Renders one entry; the flag is true when the failure happened while
/// rendering or writing rather than while loading or validating.
fn render_entry(
    entry: &LoadedTrack,
    validation: &ValidationResult,
    out_root: &Path,
) -> (BatchTrackResult, bool) {
    let start = Instant::now();
    let failure = |errors: Vec<JsonError>, warnings: Vec<JsonWarning>| BatchTrackResult {
        label: entry.label.clone(),
        success: false,
        output: None,
        errors,
        warnings,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    let errors: Vec<JsonError> = reporting::errors_to_json(&validation.errors)
        .into_iter()
        .filter(|e| belongs_to_entry(e.path.as_deref(), entry.index))
        .collect();
    let warnings: Vec<JsonWarning> = reporting::warnings_to_json(&validation.warnings)
        .into_iter()
        .filter(|w| belongs_to_entry(w.path.as_deref(), entry.index))
        .collect();

    let track = match &entry.track {
        Ok(track) => track,
        Err(e) => {
            // Note-name failures are already among the validation errors.
            let errors = if errors.is_empty() {
                let mut error = JsonError::new(
                    e.code().map(|c| c.code()).unwrap_or(error_codes::JSON_PARSE),
                    e.to_string(),
                );
                error.path = Some(format!("tracks[{}]", entry.index));
                vec![error]
            } else {
                errors
            };
            return (failure(errors, warnings), false);
        }
    };

    if !errors.is_empty() {
        return (failure(errors, warnings), false);
    }

    match reporting::render_to_dir(track, None, out_root) {
        Ok(rendered) => {
            let output = TrackOutput::new(
                &track.output_name,
                &rendered.path.to_string_lossy(),
                &rendered.result,
                canonical_track_hash(track).ok(),
            );
            (
                BatchTrackResult {
                    label: entry.label.clone(),
                    success: true,
                    output: Some(output),
                    errors: Vec::new(),
                    warnings,
                    duration_ms: start.elapsed().as_millis() as u64,
                },
                false,
            )
        }
        Err(e) => {
            tracing::warn!(track = %entry.label, error = %e, "track failed to render");
            let is_render_failure = reporting::render_exit_code(&e) == EXIT_RENDER_ERROR;
            (failure(render_error_to_json(&e), warnings), is_render_failure)
        }
    }
}

fn print_human(output: &BatchOutput) {
    for track in &output.tracks {
        if track.success {
            let path = track.output.as_ref().map(|o| o.path.as_str()).unwrap_or("");
            println!(
                "  {} {} -> {} ({}ms)",
                "OK".green().bold(),
                track.label,
                path,
                track.duration_ms
            );
        } else {
            println!("  {} {}", "FAILED".red().bold(), track.label);
        }
        reporting::print_warnings(&track.warnings);
        reporting::print_errors(&track.errors);
    }

    println!();
    let summary = format!(
        "{} tracks: {} succeeded, {} failed",
        output.total, output.succeeded, output.failed
    );
    if output.success {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red());
    }
}
