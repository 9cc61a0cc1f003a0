//! Error types for the render backend.

use bgmgen_spec::ValidationError;
use thiserror::Error;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur while rendering a track.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The track failed validation; nothing was rendered.
    #[error("track '{name}' is invalid: {}", join_errors(.errors))]
    InvalidSpec {
        /// Output name of the rejected track.
        name: String,
        /// Every validation error found.
        errors: Vec<ValidationError>,
    },

    /// The rendered PCM data would not fit a RIFF size field.
    #[error("track '{name}' is too long: {bytes} bytes of PCM data exceed the WAV limit")]
    OutputTooLarge {
        /// Output name of the rejected track.
        name: String,
        /// PCM size the track would have produced.
        bytes: u64,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::InvalidSpec { .. } => "BGM_001",
            RenderError::OutputTooLarge { .. } => "BGM_002",
            RenderError::Io(_) => "BGM_003",
        }
    }

    /// Validation errors behind an [`RenderError::InvalidSpec`], empty otherwise.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            RenderError::InvalidSpec { errors, .. } => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgmgen_spec::ErrorCode;

    #[test]
    fn test_invalid_spec_message_lists_errors() {
        let err = RenderError::InvalidSpec {
            name: "boss".to_string(),
            errors: vec![
                ValidationError::with_path(ErrorCode::InvalidTempo, "bad tempo", "tempo_bpm"),
                ValidationError::new(ErrorCode::InvalidPattern, "empty"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "track 'boss' is invalid: E003: bad tempo (at tempo_bpm); E002: empty"
        );
        assert_eq!(err.code(), "BGM_001");
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn test_codes_distinct() {
        let too_large = RenderError::OutputTooLarge {
            name: "x".to_string(),
            bytes: 1,
        };
        let io = RenderError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_ne!(too_large.code(), io.code());
        assert!(io.validation_errors().is_empty());
    }
}
