//! Validate command implementation
//!
//! Checks a track or track-set document without rendering anything.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use bgmgen_spec::{validate_track, validate_track_set, SpecError, TrackSet};
use colored::Colorize;

use super::json_output::{
    error_codes, input_error_to_json, print_json, JsonError, ValidateOutput,
};
use super::reporting::{self, EXIT_SPEC_ERROR};
use crate::input::{load_document, Document};

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(spec_path: &str, json_output: bool) -> Result<ExitCode> {
    let output = check(spec_path);
    let code = if output.success { 0 } else { EXIT_SPEC_ERROR };

    if json_output {
        print_json(&output)?;
    } else {
        print_human(spec_path, &output);
    }

    Ok(reporting::exit(code))
}

/// Loads and validates a document.
pub fn check(spec_path: &str) -> ValidateOutput {
    let loaded = match load_document(Path::new(spec_path)) {
        Ok(loaded) => loaded,
        Err(e) => {
            return ValidateOutput {
                success: false,
                kind: None,
                source_hash: None,
                tracks: 0,
                errors: vec![input_error_to_json(&e, spec_path)],
                warnings: Vec::new(),
            }
        }
    };

    let kind = loaded.document.kind().to_string();
    let (tracks, result, mut errors) = match &loaded.document {
        Document::Track(track) => (1, validate_track(track), Vec::new()),
        Document::Set(set) => (set.len(), validate_track_set(set), unparsed_entry_errors(set)),
    };

    errors.extend(reporting::errors_to_json(&result.errors));
    let warnings = reporting::warnings_to_json(&result.warnings);

    ValidateOutput {
        success: errors.is_empty(),
        kind: Some(kind),
        source_hash: Some(loaded.source_hash),
        tracks,
        errors,
        warnings,
    }
}

/// Entries that failed to parse for reasons other than a note name.
///
/// Note-name failures are already reported by set validation as `E001`.
fn unparsed_entry_errors(set: &TrackSet) -> Vec<JsonError> {
    set.entries
        .iter()
        .filter_map(|entry| match &entry.track {
            Err(e) if !matches!(e, SpecError::InvalidNoteName { .. }) => Some(JsonError {
                code: error_codes::JSON_PARSE.to_string(),
                message: e.to_string(),
                path: Some(format!("tracks[{}]", entry.index)),
                file: None,
            }),
            _ => None,
        })
        .collect()
}

fn print_human(spec_path: &str, output: &ValidateOutput) {
    println!("{} {}", "Validating:".cyan().bold(), spec_path);
    if let Some(kind) = &output.kind {
        println!("{} {} ({} tracks)", "Document:".dimmed(), kind, output.tracks);
    }

    reporting::print_warnings(&output.warnings);
    reporting::print_errors(&output.errors);

    if output.success {
        println!("{} {}", "OK".green().bold(), spec_path);
    } else {
        println!(
            "{} {} ({} errors)",
            "INVALID".red().bold(),
            spec_path,
            output.errors.len()
        );
    }
}
