//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for HomeMate phone
//! verification. It provides concrete implementations of the OTP store and
//! SMS dispatcher traits defined in `hm_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: Redis client with retry logic
//! - **Store**: Redis, in-memory and fallback OTP stores
//! - **SMS**: Console, Twilio and AWS SNS dispatchers
//!
//! ## Features
//!
//! - `redis-cache`: Enable Redis caching support (default)
//! - `twilio-sms`: Enable Twilio SMS service (default)
//! - `aws-sns`: Enable AWS SNS SMS service (default)

// Re-export core types for convenience
pub use hm_core::errors::{DomainError, DomainResult};

/// Cache module - Redis client and operations
pub mod cache;

/// Store module - OTP record persistence
pub mod store;

/// SMS service module - External SMS providers
pub mod sms;

pub use cache::RedisClient;
pub use sms::{create_sms_dispatcher, SmsDispatcherKind};
pub use store::{create_otp_store, durable_timeout_for, FallbackOtpStore, MemoryOtpStore, RedisOtpStore};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Operation did not finish in time
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),
}

impl InfrastructureError {
    /// Convert an SMS failure into the domain dispatch error for `provider`
    pub fn into_dispatch(self, provider: &str) -> DomainError {
        match self {
            InfrastructureError::Sms(message) | InfrastructureError::Config(message) => {
                DomainError::dispatch(provider, message)
            }
            other => DomainError::dispatch(provider, other.to_string()),
        }
    }
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Cache(e) => DomainError::store(e.to_string()),
            InfrastructureError::Timeout(message) => DomainError::store(format!("timed out: {}", message)),
            InfrastructureError::Serialization(e) => DomainError::Internal {
                message: format!("Failed to decode stored OTP record: {}", e),
            },
            InfrastructureError::Config(message) => DomainError::Config { message },
            InfrastructureError::Sms(message) => DomainError::dispatch("sms", message),
        }
    }
}
