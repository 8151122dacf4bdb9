//! Unified error type for cifinder operations.
//!
//! Every fallible library operation returns [`CiFinderError`]. The variants
//! follow the failure taxonomy of the client:
//!
//! - `Validation`: client-side checks (file extension, `topk` range) that fail
//!   before any request is sent
//! - `Backend`: any failure of one of the three backend calls. Timeouts, 4xx
//!   and 5xx are folded into one message per operation.
//! - `Ingest`: a backend payload that does not have the expected shape
//! - `Config`, `Session`, `Io`: local files
//!
//! # Error Codes
//!
//! - E001-E009: I/O errors
//! - E010-E019: ingest errors
//! - E020-E029: configuration errors
//! - E030-E039: backend errors
//! - E040-E049: session errors
//! - E050-E059: validation errors

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CiFinderError>;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// I/O error - file not found
    pub const IO_FILE_NOT_FOUND: ErrorCode = ErrorCode("E001");
    /// I/O error - permission denied
    pub const IO_PERMISSION_DENIED: ErrorCode = ErrorCode("E002");
    /// I/O error - generic
    pub const IO_GENERIC: ErrorCode = ErrorCode("E009");

    /// Ingest error - payload is not valid JSON
    pub const INGEST_JSON: ErrorCode = ErrorCode("E010");
    /// Ingest error - attribute value has the wrong type for its namespace
    pub const INGEST_TYPE: ErrorCode = ErrorCode("E011");
    /// Ingest error - generic
    pub const INGEST_GENERIC: ErrorCode = ErrorCode("E019");

    /// Config error - invalid value
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E020");
    /// Config error - file could not be parsed
    pub const CONFIG_PARSE: ErrorCode = ErrorCode("E021");
    /// Config error - generic
    pub const CONFIG_GENERIC: ErrorCode = ErrorCode("E029");

    /// Backend error - upload of the report failed
    pub const BACKEND_UPLOAD: ErrorCode = ErrorCode("E030");
    /// Backend error - similarity search failed
    pub const BACKEND_SEARCH: ErrorCode = ErrorCode("E031");
    /// Backend error - download failed
    pub const BACKEND_DOWNLOAD: ErrorCode = ErrorCode("E032");

    /// Session error - the session has no search result yet
    pub const SESSION_NO_RESULT: ErrorCode = ErrorCode("E040");
    /// Session error - candidate index out of range
    pub const SESSION_INDEX: ErrorCode = ErrorCode("E041");
    /// Session error - generic
    pub const SESSION_GENERIC: ErrorCode = ErrorCode("E049");

    /// Validation error - file is not a .ste report
    pub const VALIDATION_EXTENSION: ErrorCode = ErrorCode("E050");
    /// Validation error - topk out of range
    pub const VALIDATION_TOPK: ErrorCode = ErrorCode("E051");
    /// Validation error - candidate cannot be downloaded
    pub const VALIDATION_NOT_DOWNLOADABLE: ErrorCode = ErrorCode("E052");
    /// Validation error - malformed selection argument
    pub const VALIDATION_SELECTION: ErrorCode = ErrorCode("E053");

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The backend call an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BackendOperation {
    Upload,
    Search,
    Download,
}

impl BackendOperation {
    /// The one message shown to the user for any failure of this call.
    #[must_use]
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Upload => "Fail to upload the TAC report",
            Self::Search => "There is no matching B2B in CI phase.",
            Self::Download => "cannot download ste file",
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            Self::Upload => ErrorCode::BACKEND_UPLOAD,
            Self::Search => ErrorCode::BACKEND_SEARCH,
            Self::Download => ErrorCode::BACKEND_DOWNLOAD,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum CiFinderError {
    /// Client-side validation failed; nothing was sent.
    #[error("[{code}] {message}")]
    Validation { code: ErrorCode, message: String },

    /// A backend call failed. `cause` is kept for logging only.
    #[error("[{code}] {}", .operation.failure_message())]
    Backend {
        code: ErrorCode,
        operation: BackendOperation,
        cause: String,
    },

    /// A backend payload did not have the expected shape.
    #[error("[{code}] Invalid backend payload: {message}")]
    Ingest { code: ErrorCode, message: String },

    #[error("[{code}] Configuration error: {message}")]
    Config {
        code: ErrorCode,
        message: String,
        path: Option<PathBuf>,
    },

    #[error("[{code}] Session error: {message}")]
    Session { code: ErrorCode, message: String },

    #[error("[{code}] I/O error: {message}")]
    Io {
        code: ErrorCode,
        message: String,
        path: Option<PathBuf>,
        inner: Option<Arc<std::io::Error>>,
    },
}

impl CiFinderError {
    #[must_use]
    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn backend(operation: BackendOperation, cause: impl ToString) -> Self {
        Self::Backend {
            code: operation.code(),
            operation,
            cause: cause.to_string(),
        }
    }

    #[must_use]
    pub fn ingest(message: impl Into<String>) -> Self {
        Self::Ingest {
            code: ErrorCode::INGEST_GENERIC,
            message: message.into(),
        }
    }

    /// An attribute value whose JSON type does not fit its namespace.
    #[must_use]
    pub fn ingest_type(test_case: &str, attribute: &str, expected: &str) -> Self {
        Self::Ingest {
            code: ErrorCode::INGEST_TYPE,
            message: format!(
                "attribute '{}' of test case '{}' is not a {}",
                attribute, test_case, expected
            ),
        }
    }

    #[must_use]
    pub fn config(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_GENERIC,
            message: message.into(),
            path,
        }
    }

    #[must_use]
    pub fn config_with_code(code: ErrorCode, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            path,
        }
    }

    #[must_use]
    pub fn session(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Session {
            code,
            message: message.into(),
        }
    }

    /// Create an I/O error from a std::io::Error.
    #[must_use]
    pub fn from_io_error(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::IO_FILE_NOT_FOUND,
            std::io::ErrorKind::PermissionDenied => ErrorCode::IO_PERMISSION_DENIED,
            _ => ErrorCode::IO_GENERIC,
        };
        Self::Io {
            code,
            message: err.to_string(),
            path,
            inner: Some(Arc::new(err)),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. }
            | Self::Backend { code, .. }
            | Self::Ingest { code, .. }
            | Self::Config { code, .. }
            | Self::Session { code, .. }
            | Self::Io { code, .. } => *code,
        }
    }

    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "Validation",
            Self::Backend { .. } => "Backend",
            Self::Ingest { .. } => "Ingest",
            Self::Config { .. } => "Config",
            Self::Session { .. } => "Session",
            Self::Io { .. } => "I/O",
        }
    }

    /// Check if this error is something the user can fix.
    ///
    /// Validation, configuration and session errors are fixed by changing
    /// the command line or a local file. Backend and ingest failures are not.
    #[must_use]
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Config { .. } | Self::Session { .. }
        )
    }

    /// Underlying cause of a backend failure, for diagnostics.
    #[must_use]
    pub fn cause(&self) -> Option<&str> {
        match self {
            Self::Backend { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CiFinderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Ingest {
            code: ErrorCode::INGEST_JSON,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_hides_cause_in_display() {
        let err = CiFinderError::backend(BackendOperation::Search, "HTTP 500: boom");
        assert_eq!(err.code(), ErrorCode::BACKEND_SEARCH);
        assert_eq!(
            err.to_string(),
            "[E031] There is no matching B2B in CI phase."
        );
        assert_eq!(err.cause(), Some("HTTP 500: boom"));
        assert!(!err.is_user_fixable());
    }

    #[test]
    fn test_validation_error_is_user_fixable() {
        let err = CiFinderError::validation(
            ErrorCode::VALIDATION_EXTENSION,
            "This file is not a ste file.",
        );
        assert_eq!(err.category(), "Validation");
        assert!(err.is_user_fixable());
        assert_eq!(err.to_string(), "[E050] This file is not a ste file.");
    }

    #[test]
    fn test_io_error_code_from_kind() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = CiFinderError::from_io_error(io_err, Some(PathBuf::from("/tmp/x")));
        assert_eq!(err.code(), ErrorCode::IO_FILE_NOT_FOUND);
        assert_eq!(err.category(), "I/O");
    }

    #[test]
    fn test_ingest_type_message_names_location() {
        let err = CiFinderError::ingest_type("TC1", "ready", "boolean");
        assert_eq!(err.code(), ErrorCode::INGEST_TYPE);
        assert!(err.to_string().contains("'ready' of test case 'TC1'"));
    }

    #[test]
    fn test_serde_error_converts_to_ingest() {
        let err: CiFinderError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), ErrorCode::INGEST_JSON);
    }
}
