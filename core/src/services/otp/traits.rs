//! Traits for OTP persistence and SMS delivery

use async_trait::async_trait;

use crate::domain::entities::OtpRecord;
use crate::errors::DomainResult;

use super::types::DispatchReceipt;

/// Storage for pending OTP records, keyed by phone number
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store a record, replacing any existing record for the same phone number
    async fn put(&self, record: OtpRecord) -> DomainResult<()>;
    /// Get the pending record for a phone number
    async fn get(&self, phone_number: &str) -> DomainResult<Option<OtpRecord>>;
    /// Remove the record for a phone number; absent records are not an error
    async fn delete(&self, phone_number: &str) -> DomainResult<()>;
}

/// Outbound SMS delivery
#[async_trait]
pub trait SmsDispatcher: Send + Sync {
    /// Send a text message, failing with `DomainError::Dispatch` when the
    /// provider is unconfigured or rejects the message
    async fn send(&self, phone_number: &str, message: &str) -> DomainResult<DispatchReceipt>;
    /// Provider name for logs and health reporting
    fn provider_name(&self) -> &str;
}
