//! Error types for paydesk-core
//!
//! Every database and file failure is converted into a [`CoreError`] at the
//! operation boundary. The HTTP layer maps the variants to status codes and
//! the seeding driver logs them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Filtered query returned no rows
    NotFound,
    /// Missing or malformed request fields
    BadRequest,
    /// Foreign key, unique or not-null violation
    ConstraintViolation,
    /// CSV source could not be read
    IoError,
    /// CSV source could not be parsed
    CsvError,
    /// Any other database failure
    DatabaseError,
    /// Anything else
    Unhandled,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
            ErrorCode::BadRequest => write!(f, "BAD_REQUEST"),
            ErrorCode::ConstraintViolation => write!(f, "CONSTRAINT_VIOLATION"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::CsvError => write!(f, "CSV_ERROR"),
            ErrorCode::DatabaseError => write!(f, "DATABASE_ERROR"),
            ErrorCode::Unhandled => write!(f, "UNHANDLED"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Detailed error information for logs and API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for paydesk-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {message}")]
    Csv { path: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Unhandled { message: String },
}

impl CoreError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        CoreError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        CoreError::BadRequest {
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::BadRequest { .. } => ErrorCode::BadRequest,
            CoreError::ConstraintViolation { .. } => ErrorCode::ConstraintViolation,
            CoreError::Io { .. } => ErrorCode::IoError,
            CoreError::Csv { .. } => ErrorCode::CsvError,
            CoreError::Database { .. } => ErrorCode::DatabaseError,
            CoreError::Unhandled { .. } => ErrorCode::Unhandled,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotFound { .. } => ErrorSeverity::Info,
            CoreError::BadRequest { .. } => ErrorSeverity::Info,
            CoreError::ConstraintViolation { .. } => ErrorSeverity::Warning,
            CoreError::Io { .. } => ErrorSeverity::Error,
            CoreError::Csv { .. } => ErrorSeverity::Error,
            CoreError::Database { .. } => ErrorSeverity::Error,
            CoreError::Unhandled { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::ConstraintViolation { message } => {
                details = details.with_detail(serde_json::json!({ "database_message": message }));
                details = details.with_suggestion(
                    "Check that referenced clients and transactions exist.".to_string(),
                );
            }
            CoreError::Io { path, .. } => {
                details = details.with_suggestion(format!("Ensure {} exists and is readable.", path));
            }
            CoreError::Csv { path, .. } => {
                details = details.with_suggestion(format!(
                    "Check the header row and quoting of {}.",
                    path
                ));
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<sqlx::Error> for CoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => CoreError::not_found("Row"),
            sqlx::Error::Database(db_error) => {
                let message = db_error.message().to_string();
                if db_error.is_foreign_key_violation()
                    || db_error.is_unique_violation()
                    || db_error.is_check_violation()
                    || message.contains("constraint failed")
                {
                    CoreError::ConstraintViolation { message }
                } else {
                    CoreError::Database { message }
                }
            }
            other => CoreError::Database {
                message: other.to_string(),
            },
        }
    }
}
