//! Error types for track spec parsing and validation.

use thiserror::Error;

/// Error codes for track validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Pattern errors (E001-E002)
    /// E001: Note token outside the recognized grammar
    InvalidNoteName,
    /// E002: Pattern is empty
    InvalidPattern,

    // Spec errors (E003-E006)
    /// E003: Tempo is not a positive finite number
    InvalidTempo,
    /// E004: Duration is not a positive finite number
    InvalidDuration,
    /// E005: Complexity outside 1..=8
    InvalidComplexity,
    /// E006: Intensity is not a positive finite number
    InvalidIntensity,

    // Output errors (E007-E008)
    /// E007: Invalid output_name format
    InvalidOutputName,
    /// E008: Two tracks in a set share an output_name
    DuplicateOutputName,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidNoteName => "E001",
            ErrorCode::InvalidPattern => "E002",
            ErrorCode::InvalidTempo => "E003",
            ErrorCode::InvalidDuration => "E004",
            ErrorCode::InvalidComplexity => "E005",
            ErrorCode::InvalidIntensity => "E006",
            ErrorCode::InvalidOutputName => "E007",
            ErrorCode::DuplicateOutputName => "E008",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for track validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Duration shorter than a single step (renders no audio)
    EmptyRender,
    /// W002: Complexity does not divide 8 (irregular kick period)
    IrregularKickPeriod,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::EmptyRender => "W001",
            WarningCode::IrregularKickPeriod => "W002",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// JSON path to the problematic field (e.g., "bass_pattern\[3\]").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a JSON path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// JSON path to the problematic field.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation warning with a JSON path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

fn at_path(path: &Option<String>) -> String {
    path.as_ref()
        .map(|p| format!(" (at {})", p))
        .unwrap_or_default()
}

/// Top-level error type for spec operations.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A note token could not be parsed into a rest or (class, octave).
    #[error("invalid note name '{token}'{}", at_path(.path))]
    InvalidNoteName {
        /// The offending token, as written.
        token: String,
        /// JSON path of the token when it came from a document.
        path: Option<String>,
    },

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecError {
    /// Creates an invalid note name error without a document path.
    pub fn invalid_note(token: impl Into<String>) -> Self {
        Self::InvalidNoteName {
            token: token.into(),
            path: None,
        }
    }

    /// Attaches a JSON path to a note error; other variants pass through.
    pub fn at(self, path: impl Into<String>) -> Self {
        match self {
            Self::InvalidNoteName { token, .. } => Self::InvalidNoteName {
                token,
                path: Some(path.into()),
            },
            other => other,
        }
    }

    /// Returns the validation error code this error corresponds to, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::InvalidNoteName { .. } => Some(ErrorCode::InvalidNoteName),
            Self::JsonParse(_) | Self::Io(_) => None,
        }
    }
}

/// Result of track validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed (no errors).
    pub ok: bool,
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Creates a failed validation result.
    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.ok = false;
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Folds another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        for error in other.errors {
            self.add_error(error);
        }
        self.warnings.extend(other.warnings);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        if self.ok {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}
