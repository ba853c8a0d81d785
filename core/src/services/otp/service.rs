//! OTP service implementation

use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use hm_shared::phone::{canonical_phone_number, is_valid_phone, mask_phone_number};

use crate::domain::entities::OtpRecord;
use crate::errors::{DomainError, DomainResult};

use super::clock::{Clock, SystemClock};
use super::config::OtpServiceConfig;
use super::key_lock::KeyedLock;
use super::traits::{OtpStore, SmsDispatcher};
use super::types::{SendOtpResult, VerifyOutcome};

/// OTP service for sending and verifying phone number codes
pub struct OtpService<S, D>
where
    S: OtpStore,
    D: SmsDispatcher,
{
    /// Pending record storage
    store: Arc<S>,
    /// SMS delivery
    dispatcher: Arc<D>,
    /// Service configuration
    config: OtpServiceConfig,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Serializes operations on the same phone number
    locks: KeyedLock,
}

impl<S, D> OtpService<S, D>
where
    S: OtpStore,
    D: SmsDispatcher,
{
    /// Create a new OTP service using the wall clock
    pub fn new(store: Arc<S>, dispatcher: Arc<D>, config: OtpServiceConfig) -> Self {
        Self::with_clock(store, dispatcher, config, Arc::new(SystemClock))
    }

    /// Create a new OTP service with an explicit time source
    pub fn with_clock(
        store: Arc<S>,
        dispatcher: Arc<D>,
        config: OtpServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            config,
            clock,
            locks: KeyedLock::new(),
        }
    }

    pub fn config(&self) -> &OtpServiceConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn dispatcher(&self) -> &Arc<D> {
        &self.dispatcher
    }

    /// Generate a code for the phone number, store it and send it by SMS
    ///
    /// Any pending code for the same number is replaced. A dispatch failure
    /// is returned as an error; the stored record is kept.
    ///
    /// # Arguments
    ///
    /// * `phone_number` - Destination number, E.164 with or without `+`
    ///
    /// # Returns
    ///
    /// * `Ok(SendOtpResult)` - Confirmation message, lifetime and provider message id
    /// * `Err(DomainError)` - Invalid phone number, store or dispatch failure
    pub async fn send_otp(&self, phone_number: &str) -> DomainResult<SendOtpResult> {
        self.issue(phone_number, "otp_sent").await
    }

    /// Issue a fresh code, identical to `send_otp`
    pub async fn resend_otp(&self, phone_number: &str) -> DomainResult<SendOtpResult> {
        self.issue(phone_number, "otp_resent").await
    }

    /// Check a code against the pending record for the phone number
    ///
    /// Malformed input is rejected with `DomainError::Validation` and consumes
    /// no attempt. Every other result, including failures the user must act
    /// on, is reported as a `VerifyOutcome`.
    pub async fn verify_otp(&self, phone_number: &str, code: &str) -> DomainResult<VerifyOutcome> {
        let phone = canonical_phone_number(phone_number);
        if phone.is_empty() {
            return Err(DomainError::validation("phoneNumber", "Phone number is required"));
        }

        let code = code.trim();
        if !OtpRecord::is_well_formed_code(code) {
            return Err(DomainError::validation("otp", "OTP must be 4 digits"));
        }

        let masked = mask_phone_number(&phone);
        let _guard = self.locks.acquire(&phone).await;

        let mut record = match self.bounded_store("store.get", self.store.get(&phone)).await? {
            Some(record) => record,
            None => {
                tracing::info!(phone = %masked, event = "otp_not_found", "No pending OTP");
                return Ok(VerifyOutcome::NotFound);
            }
        };

        let now = self.clock.now();

        if record.is_expired_at(now) {
            self.bounded_store("store.delete", self.store.delete(&phone)).await?;
            tracing::info!(phone = %masked, event = "otp_expired", "OTP expired");
            return Ok(VerifyOutcome::Expired);
        }

        if record.is_exhausted(self.config.max_attempts) {
            self.bounded_store("store.delete", self.store.delete(&phone)).await?;
            tracing::warn!(
                phone = %masked,
                event = "otp_exhausted",
                attempts = record.attempts,
                "OTP attempts already exhausted"
            );
            return Ok(VerifyOutcome::Exhausted);
        }

        let attempts = record.record_attempt();
        self.bounded_store("store.put", self.store.put(record.clone())).await?;

        if !record.matches(code) {
            let attempts_remaining = record.remaining_attempts(self.config.max_attempts);

            // The wrong code that uses up the last attempt ends the OTP: the
            // record is removed and the caller sees exhaustion, not a zero count.
            if attempts_remaining == 0 {
                self.bounded_store("store.delete", self.store.delete(&phone)).await?;
                tracing::warn!(
                    phone = %masked,
                    event = "otp_exhausted",
                    attempts = attempts,
                    "Final verification attempt failed"
                );
                return Ok(VerifyOutcome::Exhausted);
            }

            tracing::info!(
                phone = %masked,
                event = "otp_mismatch",
                attempts = attempts,
                attempts_remaining = attempts_remaining,
                "Invalid OTP submitted"
            );
            return Ok(VerifyOutcome::Mismatch { attempts_remaining });
        }

        record.mark_verified();
        self.bounded_store("store.delete", self.store.delete(&phone)).await?;

        tracing::info!(
            phone = %masked,
            event = "otp_verified",
            attempts = attempts,
            "OTP verified"
        );

        Ok(VerifyOutcome::Verified)
    }

    /// Whether a pending record exists for the phone number
    pub async fn has_pending_otp(&self, phone_number: &str) -> DomainResult<bool> {
        let phone = canonical_phone_number(phone_number);
        Ok(self
            .bounded_store("store.get", self.store.get(&phone))
            .await?
            .is_some())
    }

    async fn issue(&self, phone_number: &str, event: &'static str) -> DomainResult<SendOtpResult> {
        let trimmed = phone_number.trim();
        if !is_valid_phone(trimmed) {
            return Err(DomainError::validation(
                "phoneNumber",
                "Please provide a valid phone number",
            ));
        }

        let phone = canonical_phone_number(trimmed);
        let masked = mask_phone_number(&phone);

        let record = OtpRecord::issue(
            phone.clone(),
            OtpRecord::generate_code(),
            self.clock.now(),
            Duration::minutes(self.config.code_expiration_minutes),
        );
        let expires_at = record.expires_at;
        let message = self.config.render_message(&record.code);

        {
            let _guard = self.locks.acquire(&phone).await;
            self.bounded_store("store.put", self.store.put(record)).await?;
        }

        tracing::info!(
            phone = %masked,
            event = "otp_generated",
            expires_at = %expires_at,
            "OTP stored"
        );

        let receipt = self
            .bounded(
                "sms.send",
                self.config.dispatch_timeout,
                self.dispatcher.send(&phone, &message),
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    phone = %masked,
                    provider = self.dispatcher.provider_name(),
                    error = %e,
                    "Failed to send OTP"
                );
                e
            })?;

        tracing::info!(
            phone = %masked,
            event = event,
            provider = self.dispatcher.provider_name(),
            message_id = %receipt.message_id,
            "OTP dispatched"
        );

        Ok(SendOtpResult {
            message: SendOtpResult::MESSAGE.to_string(),
            expires_in: self.config.expires_in_seconds(),
            expires_at,
            message_id: receipt.message_id,
        })
    }

    async fn bounded_store<T, F>(&self, operation: &'static str, fut: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        self.bounded(operation, self.config.store_timeout, fut).await
    }

    async fn bounded<T, F>(
        &self,
        operation: &'static str,
        limit: StdDuration,
        fut: F,
    ) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(operation = operation, timeout_ms = limit.as_millis() as u64, "Operation timed out");
                Err(DomainError::Timeout {
                    operation: operation.to_string(),
                    after_ms: limit.as_millis() as u64,
                })
            }
        }
    }
}
