// Copyright 2025 Cowboy AI, LLC.

//! Error types for case-file operations

use thiserror::Error;

/// Errors that can occur while handling prosecution case files
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Case file not found
    #[error("Case not found: {0}")]
    CaseNotFound(String),

    /// Defendant not found on a case
    #[error("Defendant {defendant_id} not found on case {case_id}")]
    DefendantNotFound {
        /// Case that was searched
        case_id: String,
        /// Defendant that was searched for
        defendant_id: String,
    },

    /// Invalid operation
    #[error("Invalid operation: {reason}")]
    InvalidOperation {
        /// Reason why the operation is invalid
        reason: String,
    },

    /// Invalid case status transition
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current status
        from: String,
        /// Attempted target status
        to: String,
    },

    /// Concurrency conflict
    #[error("Concurrency conflict: expected version {expected}, but found {actual}")]
    ConcurrencyConflict {
        /// Expected version
        expected: u64,
        /// Actual version
        actual: u64,
    },

    /// Validation error that is not expressible as a problem (malformed input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Submission rejected by the validation pipeline
    #[error("Prosecution rejected: {0}")]
    ProsecutionRejected(String),

    /// Reference data lookup failed
    #[error("Reference data unavailable: {lookup} - {message}")]
    ReferenceDataUnavailable {
        /// Name of the lookup
        lookup: String,
        /// Error message from the service
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Publishing events failed
    #[error("Event publishing failed: {0}")]
    PublishError(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Already exists error
    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

/// Result type for case-file operations
pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for DomainError {
    fn from(err: serde_yaml::Error) -> Self {
        DomainError::ConfigError(err.to_string())
    }
}

impl DomainError {
    /// Create a reference data error for the named lookup
    pub fn reference_data(lookup: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::ReferenceDataUnavailable {
            lookup: lookup.into(),
            message: message.into(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::CaseNotFound(_) | DomainError::DefendantNotFound { .. }
        )
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DomainError::ValidationError(_) | DomainError::ProsecutionRejected(_)
        )
    }

    /// Check if this is a concurrency error
    pub fn is_concurrency_error(&self) -> bool {
        matches!(self, DomainError::ConcurrencyConflict { .. })
    }
}
