//! Error types and exit codes for chatlens
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (persistence, classifier setup)
//! - 2: Usage error (bad flags, invalid configuration values)
//! - 3: Data error (missing or malformed input)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the chatlens binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing or malformed input (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during chatlens operations
#[derive(Error, Debug)]
pub enum ChatlensError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("input not found: {path:?}")]
    InputNotFound { path: PathBuf },

    #[error("invalid input in {path:?}: {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("classifier setup failed: {0}")]
    Classifier(String),

    #[error("{0}")]
    Other(String),
}

impl ChatlensError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        ChatlensError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        ChatlensError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an input file whose content could not be used
    pub fn invalid_input(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        ChatlensError::InvalidInput {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ChatlensError::UsageError(_) | ChatlensError::InvalidValue { .. } => ExitCode::Usage,

            ChatlensError::InputNotFound { .. }
            | ChatlensError::InvalidInput { .. } => ExitCode::Data,

            ChatlensError::Io(_)
            | ChatlensError::Json(_)
            | ChatlensError::Toml(_)
            | ChatlensError::FailedOperationWithTarget { .. }
            | ChatlensError::Spreadsheet(_)
            | ChatlensError::Classifier(_)
            | ChatlensError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            ChatlensError::UsageError(_) => "usage_error",
            ChatlensError::InvalidValue { .. } => "invalid_value",
            ChatlensError::InputNotFound { .. } => "input_not_found",
            ChatlensError::InvalidInput { .. } => "invalid_input",
            ChatlensError::Io(_) => "io_error",
            ChatlensError::Json(_) => "json_error",
            ChatlensError::Toml(_) => "toml_error",
            ChatlensError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            ChatlensError::Spreadsheet(_) => "spreadsheet_error",
            ChatlensError::Classifier(_) => "classifier_error",
            ChatlensError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for chatlens operations
pub type Result<T> = std::result::Result<T, ChatlensError>;
