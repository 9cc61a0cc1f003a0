//! Generate command implementation
//!
//! Renders a single track document to `<out_root>/<output_name>.wav`.

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use bgmgen_spec::{canonical_track_hash, validate_track};
use colored::Colorize;

use super::json_output::{
    error_codes, input_error_to_json, print_json, render_error_to_json, GenerateOutput,
    JsonError, TrackOutput,
};
use super::reporting::{self, DEFAULT_OUT_ROOT, EXIT_SPEC_ERROR};
use crate::input::{load_document, Document};

/// Run the generate command
///
/// # Arguments
/// * `spec_path` - Path to a track document
/// * `out_root` - Output directory (default: current directory)
/// * `seed` - Seed override for the noise stream
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 success, 1 spec error, 2 render error
pub fn run(
    spec_path: &str,
    out_root: Option<&str>,
    seed: Option<u32>,
    json_output: bool,
) -> Result<ExitCode> {
    let start = Instant::now();
    let out_root = out_root.unwrap_or(DEFAULT_OUT_ROOT);

    if !json_output {
        println!("{} {}", "Generating:".cyan().bold(), spec_path);
    }

    let (output, code) = execute(spec_path, Path::new(out_root), seed);

    if json_output {
        print_json(&output)?;
    } else {
        print_human(&output, start.elapsed().as_millis());
    }

    Ok(reporting::exit(code))
}

/// Loads, validates, renders, and writes one track.
pub fn execute(spec_path: &str, out_root: &Path, seed: Option<u32>) -> (GenerateOutput, u8) {
    let loaded = match load_document(Path::new(spec_path)) {
        Ok(loaded) => loaded,
        Err(e) => {
            let error = input_error_to_json(&e, spec_path);
            return (GenerateOutput::failure(vec![error], vec![]), EXIT_SPEC_ERROR);
        }
    };

    let track = match loaded.document {
        Document::Track(track) => track,
        Document::Set(set) => {
            let error = JsonError::new(
                error_codes::WRONG_DOCUMENT,
                format!(
                    "document contains a track set of {} tracks; use generate-all",
                    set.len()
                ),
            )
            .with_file(spec_path);
            return (GenerateOutput::failure(vec![error], vec![]), EXIT_SPEC_ERROR);
        }
    };

    let validation = validate_track(&track);
    let warnings = reporting::warnings_to_json(&validation.warnings);
    if !validation.is_ok() {
        let errors = reporting::errors_to_json(&validation.errors);
        return (GenerateOutput::failure(errors, warnings), EXIT_SPEC_ERROR);
    }

    match reporting::render_to_dir(&track, seed, out_root) {
        Ok(rendered) => {
            let track_hash = canonical_track_hash(&track).ok();
            let output = TrackOutput::new(
                &track.output_name,
                &rendered.path.to_string_lossy(),
                &rendered.result,
                track_hash,
            );
            (
                GenerateOutput {
                    success: true,
                    output: Some(output),
                    errors: Vec::new(),
                    warnings,
                },
                0,
            )
        }
        Err(e) => {
            tracing::warn!(track = %track.output_name, error = %e, "track failed to render");
            (
                GenerateOutput::failure(render_error_to_json(&e), warnings),
                reporting::render_exit_code(&e),
            )
        }
    }
}

fn print_human(output: &GenerateOutput, elapsed_ms: u128) {
    reporting::print_warnings(&output.warnings);
    reporting::print_errors(&output.errors);

    match &output.output {
        Some(track) => {
            println!(
                "{} Wrote {} successfully",
                "OK".green().bold(),
                track.path
            );
            println!(
                "  {} {:.2}s, {} steps x {} frames, seed {}",
                "Audio:".dimmed(),
                track.duration_seconds,
                track.total_steps,
                track.samples_per_step,
                track
                    .seed
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
            println!(
                "  {} {}",
                "PCM hash:".dimmed(),
                &track.pcm_hash[..16.min(track.pcm_hash.len())]
            );
            if track.clipped_samples > 0 {
                println!(
                    "  {} {} samples clipped",
                    "!".yellow(),
                    track.clipped_samples
                );
            }
            println!("  {} {}ms", "Time:".dimmed(), elapsed_ms);
        }
        None => println!("{} generation failed", "FAILED".red().bold()),
    }
}
