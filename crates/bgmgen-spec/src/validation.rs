//! Track validation logic.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{
    ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
use crate::track::{TrackSet, TrackSpec};
use crate::SAMPLE_RATE;

/// Regex pattern for a valid output_name.
/// Format: starts with a lowercase letter, followed by up to 63 lowercase
/// letters, digits, underscores, or hyphens.
const OUTPUT_NAME_PATTERN: &str = r"^[a-z][a-z0-9_-]{0,63}$";

/// Largest accepted complexity; beyond this the kick period `8 / complexity`
/// would be zero.
pub const MAX_COMPLEXITY: u32 = 8;

static OUTPUT_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn output_name_regex() -> &'static Regex {
    OUTPUT_NAME_REGEX.get_or_init(|| Regex::new(OUTPUT_NAME_PATTERN).expect("invalid regex pattern"))
}

/// Returns true if `name` is usable as an output_name.
pub fn is_valid_output_name(name: &str) -> bool {
    output_name_regex().is_match(name)
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Validates a track and returns a validation result.
///
/// All problems are collected rather than stopping at the first one.
///
/// # Example
/// ```
/// use bgmgen_spec::{Pattern, TrackSpec};
/// use bgmgen_spec::validation::validate_track;
///
/// let track = TrackSpec::builder("stage1")
///     .tempo(130.0)
///     .duration(16.0)
///     .bass(Pattern::parse(&["C2", "-", "C3", "-"]).unwrap())
///     .melody(Pattern::parse(&["C4", "Eb4", "G4", "C5"]).unwrap())
///     .build();
///
/// assert!(validate_track(&track).is_ok());
/// ```
pub fn validate_track(track: &TrackSpec) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_output_name(track, &mut result);
    validate_timing(track, &mut result);
    validate_patterns(track, &mut result);
    validate_levels(track, &mut result);

    check_warnings(track, &mut result);

    result
}

fn validate_output_name(track: &TrackSpec, result: &mut ValidationResult) {
    if !is_valid_output_name(&track.output_name) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidOutputName,
            format!(
                "output_name must match {}, got '{}'",
                OUTPUT_NAME_PATTERN, track.output_name
            ),
            "output_name",
        ));
    }
}

fn validate_timing(track: &TrackSpec, result: &mut ValidationResult) {
    if !is_positive(track.tempo_bpm) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidTempo,
            format!("tempo_bpm must be a positive number, got {}", track.tempo_bpm),
            "tempo_bpm",
        ));
    }

    if !is_positive(track.duration_seconds) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidDuration,
            format!(
                "duration_seconds must be a positive number, got {}",
                track.duration_seconds
            ),
            "duration_seconds",
        ));
    }
}

fn validate_patterns(track: &TrackSpec, result: &mut ValidationResult) {
    for (field, pattern) in [
        ("bass_pattern", &track.bass_pattern),
        ("melody_pattern", &track.melody_pattern),
    ] {
        if pattern.is_empty() {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidPattern,
                format!("{} must contain at least one note", field),
                field,
            ));
        }
    }
}

fn validate_levels(track: &TrackSpec, result: &mut ValidationResult) {
    if track.complexity == 0 || track.complexity > MAX_COMPLEXITY {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidComplexity,
            format!(
                "complexity must be between 1 and {}, got {}",
                MAX_COMPLEXITY, track.complexity
            ),
            "complexity",
        ));
    }

    if !is_positive(track.intensity) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidIntensity,
            format!("intensity must be a positive number, got {}", track.intensity),
            "intensity",
        ));
    }
}

fn check_warnings(track: &TrackSpec, result: &mut ValidationResult) {
    if is_positive(track.tempo_bpm)
        && is_positive(track.duration_seconds)
        && track.duration_seconds < track.step_duration()
    {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::EmptyRender,
            format!(
                "duration {}s is shorter than one step ({:.4}s); the track renders no audio",
                track.duration_seconds,
                track.step_duration()
            ),
            "duration_seconds",
        ));
    } else if is_positive(track.tempo_bpm)
        && (SAMPLE_RATE as f64 * track.step_duration()).round() < 1.0
    {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::EmptyRender,
            format!(
                "tempo {} bpm gives steps shorter than one sample; the track renders no audio",
                track.tempo_bpm
            ),
            "tempo_bpm",
        ));
    }

    if (1..=MAX_COMPLEXITY).contains(&track.complexity) && MAX_COMPLEXITY % track.complexity != 0 {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::IrregularKickPeriod,
            format!(
                "complexity {} does not divide 8; kicks fall every {} steps",
                track.complexity,
                MAX_COMPLEXITY / track.complexity
            ),
            "complexity",
        ));
    }
}

/// Validates every track of a set, plus cross-track constraints.
///
/// Errors and warnings from individual tracks are re-pathed under
/// `tracks[<index>]`. Entries that failed to parse are reported as errors of
/// the matching code where one exists.
pub fn validate_track_set(set: &TrackSet) -> ValidationResult {
    let mut result = ValidationResult::default();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for entry in &set.entries {
        let prefix = format!("tracks[{}]", entry.index);
        let track = match &entry.track {
            Ok(track) => track,
            Err(SpecError::InvalidNoteName { token, path }) => {
                let path = match path {
                    Some(p) => format!("{}.{}", prefix, p),
                    None => prefix,
                };
                result.add_error(ValidationError::with_path(
                    ErrorCode::InvalidNoteName,
                    format!("invalid note name '{}'", token),
                    path,
                ));
                continue;
            }
            // Structural parse failures have no validation code; callers
            // surface them from the entry itself.
            Err(_) => continue,
        };

        let mut track_result = validate_track(track);
        for error in &mut track_result.errors {
            error.path = Some(rebase_path(&prefix, error.path.as_deref()));
        }
        for warning in &mut track_result.warnings {
            warning.path = Some(rebase_path(&prefix, warning.path.as_deref()));
        }
        result.merge(track_result);

        if let Some(first) = seen.insert(track.output_name.as_str(), entry.index) {
            result.add_error(ValidationError::with_path(
                ErrorCode::DuplicateOutputName,
                format!(
                    "output_name '{}' is already used by tracks[{}]",
                    track.output_name, first
                ),
                format!("{}.output_name", prefix),
            ));
        }
    }

    result
}

fn rebase_path(prefix: &str, path: Option<&str>) -> String {
    match path {
        Some(p) => format!("{}.{}", prefix, p),
        None => prefix.to_string(),
    }
}
