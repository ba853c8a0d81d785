//! Domain error types.
//!
//! Verification outcomes such as an expired or mismatched code are not errors;
//! they are reported through `VerifyOutcome`. `DomainError` covers input that
//! never reaches the state machine and infrastructure failures.

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Failed to send SMS via {provider}: {message}")]
    Dispatch { provider: String, message: String },

    #[error("OTP store error: {message}")]
    Store { message: String },

    #[error("{operation} timed out after {after_ms}ms")]
    Timeout { operation: String, after_ms: u64 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn dispatch(provider: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Dispatch {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        DomainError::Store {
            message: message.into(),
        }
    }

    /// Client input problem rather than an infrastructure failure
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
