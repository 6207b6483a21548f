//! Error types for spendview-core
//!
//! Every collaborator failure is mapped into [`CoreError`]. The coordinator
//! never propagates these to its callers as panics; it records them as
//! [`ErrorDetails`] in the view snapshot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Collaborator fetch rejected
    FetchFailed,
    /// Request parameters rejected by the collaborator
    InvalidRequest,
    /// Transaction not found
    TransactionNotFound,
    /// Fixture file could not be decoded
    FixtureError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::FetchFailed => write!(f, "FETCH_FAILED"),
            ErrorCode::InvalidRequest => write!(f, "INVALID_REQUEST"),
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::FixtureError => write!(f, "FIXTURE_ERROR"),
        }
    }
}

/// Detailed error information surfaced to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
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

/// Main error type for spendview-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to fetch {resource}: {message}")]
    FetchFailed { resource: String, message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("Fixture error: {message}")]
    FixtureError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::FetchFailed { .. } => ErrorCode::FetchFailed,
            CoreError::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::FixtureError { .. } => ErrorCode::FixtureError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::FetchFailed { .. } => ErrorSeverity::Error,
            CoreError::InvalidRequest { .. } => ErrorSeverity::Warning,
            CoreError::TransactionNotFound { .. } => ErrorSeverity::Info,
            CoreError::FixtureError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::FetchFailed { resource, message } => {
                details = details.with_detail(serde_json::json!({
                    "resource": resource,
                    "cause": message,
                }));
                details = details.with_suggestion(
                    "Select the filter again to reissue the request.".to_string(),
                );
            }
            CoreError::InvalidRequest { message } => {
                details = details.with_detail(serde_json::json!({ "request_message": message }));
            }
            CoreError::TransactionNotFound { .. } => {
                details = details.with_suggestion(
                    "Check if the transaction ID is part of the current view.".to_string(),
                );
            }
            CoreError::FixtureError { .. } => {
                details = details.with_suggestion(
                    "The fixture must be a JSON object with 'employees' and 'transactions'."
                        .to_string(),
                );
            }
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::FixtureError {
            message: error.to_string(),
        }
    }
}

/// Log a failed operation at a level matching the error severity
pub fn log_error(error: &CoreError, operation: &str) {
    match error.severity() {
        ErrorSeverity::Info => log::info!(
            target: "spendview::error",
            "[{}] {} - Operation: {}", error.code(), error, operation
        ),
        ErrorSeverity::Warning => log::warn!(
            target: "spendview::error",
            "[{}] {} - Operation: {}", error.code(), error, operation
        ),
        ErrorSeverity::Error | ErrorSeverity::Critical => log::error!(
            target: "spendview::error",
            "[{}] {} - Operation: {}", error.code(), error, operation
        ),
    }
}

// ==================== Tests ====================
