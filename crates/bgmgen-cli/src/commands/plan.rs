//! Plan command implementation
//!
//! Prints what the sequencer would play on each step without synthesizing
//! any audio. Useful for checking patterns and percussion against the grid.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use bgmgen_backend::sequencer::{plan_step, Sound, StepGrid, Voice, VoiceEvent};
use bgmgen_spec::{validate_track, TrackSpec, SAMPLE_RATE};
use colored::Colorize;

use super::json_output::{
    error_codes, input_error_to_json, print_json, JsonError, PlanOutput, PlanStepOutput,
    PlanVoice,
};
use super::reporting::{self, EXIT_SPEC_ERROR};
use crate::input::{load_document, Document};

/// Steps shown when `--steps` is not given.
pub const DEFAULT_PLAN_STEPS: usize = 32;

/// Run the plan command
///
/// # Arguments
/// * `spec_path` - Path to a track document
/// * `steps` - Number of steps to show (default: 32, capped at the track length)
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(spec_path: &str, steps: Option<usize>, json_output: bool) -> Result<ExitCode> {
    let output = build(spec_path, steps);
    let code = if output.success { 0 } else { EXIT_SPEC_ERROR };

    if json_output {
        print_json(&output)?;
    } else {
        print_human(&output);
    }

    Ok(reporting::exit(code))
}

/// Loads and validates a track and plans its first steps.
pub fn build(spec_path: &str, steps: Option<usize>) -> PlanOutput {
    let failure = |errors: Vec<JsonError>| PlanOutput {
        success: false,
        output_name: String::new(),
        step_duration: 0.0,
        samples_per_step: 0,
        total_steps: 0,
        steps: Vec::new(),
        errors,
    };

    let track = match load_document(Path::new(spec_path)) {
        Ok(loaded) => match loaded.document {
            Document::Track(track) => track,
            Document::Set(_) => {
                return failure(vec![JsonError::new(
                    error_codes::WRONG_DOCUMENT,
                    "plan takes a single track document",
                )
                .with_file(spec_path)])
            }
        },
        Err(e) => return failure(vec![input_error_to_json(&e, spec_path)]),
    };

    let validation = validate_track(&track);
    if !validation.is_ok() {
        return failure(reporting::errors_to_json(&validation.errors));
    }

    plan_track(&track, steps.unwrap_or(DEFAULT_PLAN_STEPS))
}

/// Plans the first `limit` steps of a valid track.
pub fn plan_track(track: &TrackSpec, limit: usize) -> PlanOutput {
    let grid = StepGrid::for_track(track, SAMPLE_RATE);
    let shown = limit.min(grid.total_steps);

    let steps = (0..shown)
        .map(|step| {
            let plan = plan_step(track, step);
            PlanStepOutput {
                step,
                start_frame: grid.step_range(step).start,
                voices: plan
                    .events()
                    .map(|event| plan_voice(track, step, event))
                    .collect(),
            }
        })
        .collect();

    PlanOutput {
        success: true,
        output_name: track.output_name.clone(),
        step_duration: grid.step_duration,
        samples_per_step: grid.samples_per_step,
        total_steps: grid.total_steps,
        steps,
        errors: Vec::new(),
    }
}

fn plan_voice(track: &TrackSpec, step: usize, event: &VoiceEvent) -> PlanVoice {
    let note = match event.voice {
        Voice::Bass => track.bass_pattern.note_at(step),
        Voice::Melody => track.melody_pattern.note_at(step),
        Voice::Percussion(_) => None,
    };
    let (frequency, envelope) = match event.sound {
        Sound::Tone {
            frequency,
            envelope,
        } => (Some(frequency), envelope.as_str().to_string()),
        Sound::Noise => (None, "burst".to_string()),
    };

    PlanVoice {
        voice: event.voice.name().to_string(),
        note: note.map(|n| n.to_string()),
        frequency,
        envelope,
        volume: event.volume,
        step_fraction: event.step_fraction,
    }
}

fn print_human(output: &PlanOutput) {
    if !output.success {
        reporting::print_errors(&output.errors);
        return;
    }

    println!(
        "{} {} ({} steps of {:.4}s, {} frames each)",
        "Plan:".cyan().bold(),
        output.output_name,
        output.total_steps,
        output.step_duration,
        output.samples_per_step
    );
    println!(
        "{:>5}  {:<8} {:<8} {:<8}",
        "step".dimmed(),
        "bass".dimmed(),
        "melody".dimmed(),
        "perc".dimmed()
    );

    for step in &output.steps {
        let mut bass = "-";
        let mut melody = "-";
        let mut perc = "-";
        for voice in &step.voices {
            match voice.voice.as_str() {
                "bass" => bass = voice.note.as_deref().unwrap_or("-"),
                "melody" => melody = voice.note.as_deref().unwrap_or("-"),
                other => perc = other,
            }
        }
        println!("{:>5}  {:<8} {:<8} {:<8}", step.step, bass, melody, perc);
    }

    if output.steps.len() < output.total_steps {
        println!(
            "{}",
            format!("... {} more steps", output.total_steps - output.steps.len()).dimmed()
        );
    }
}
