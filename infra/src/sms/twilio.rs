//! Twilio SMS Service Implementation
//!
//! This module provides SMS sending capabilities using the Twilio API.
//!
//! ## Features
//!
//! - E.164 normalization before sending
//! - Automatic retry with exponential backoff on rate limits and server errors
//! - No retry on client errors
//! - Security: Phone number masking in logs

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use twilio::{Client, OutboundMessage};

use hm_core::errors::{DomainError, DomainResult};
use hm_core::services::otp::{DispatchReceipt, SmsDispatcher};
use hm_shared::config::sms::TwilioCredentials;
use hm_shared::phone::mask_phone_number;

use super::{check_message_length, to_e164};
use crate::InfrastructureError;

const PROVIDER_NAME: &str = "Twilio";

/// Ready-to-use Twilio client and sender number
struct TwilioAccount {
    client: Client,
    from_number: String,
}

/// Twilio SMS service implementation
pub struct TwilioSmsService {
    /// `None` when credentials are missing
    account: Option<TwilioAccount>,
    /// Environment variables that were not set
    missing: Vec<&'static str>,
    /// Maximum send attempts
    max_retries: u32,
    /// Initial retry delay in milliseconds
    retry_delay_ms: u64,
}

impl TwilioSmsService {
    /// Create a new Twilio SMS service
    ///
    /// Incomplete credentials produce an unconfigured service whose sends fail.
    pub fn new(credentials: &TwilioCredentials, max_retries: u32, retry_delay_ms: u64) -> Self {
        let missing = credentials.missing();

        let account = match (
            &credentials.account_sid,
            &credentials.auth_token,
            &credentials.from_number,
        ) {
            (Some(sid), Some(token), Some(from)) => {
                info!(
                    "Twilio SMS service initialized with from number: {}",
                    mask_phone_number(from)
                );
                Some(TwilioAccount {
                    client: Client::new(sid, token),
                    from_number: from.clone(),
                })
            }
            _ => {
                warn!(
                    missing = ?missing,
                    "Twilio credentials not configured, SMS sends will fail"
                );
                None
            }
        };

        Self {
            account,
            missing,
            max_retries: max_retries.max(1),
            retry_delay_ms,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.account.is_some()
    }

    /// Send SMS with retry logic
    async fn send_with_retry(
        &self,
        account: &TwilioAccount,
        to: &str,
        message: &str,
    ) -> Result<String, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                "Sending SMS attempt {}/{} to {}",
                attempts,
                self.max_retries,
                mask_phone_number(to)
            );

            let msg = OutboundMessage::new(&account.from_number, to, message);

            match account.client.send_message(msg).await {
                Ok(response) => {
                    info!(
                        "SMS sent successfully to {} with SID: {}",
                        mask_phone_number(to),
                        response.sid
                    );
                    return Ok(response.sid);
                }
                Err(e) => {
                    error!(
                        "Failed to send SMS (attempt {}/{}): {}",
                        attempts, self.max_retries, e
                    );

                    if attempts >= self.max_retries {
                        return Err(InfrastructureError::Sms(format!(
                            "Failed to send SMS after {} attempts: {}",
                            self.max_retries, e
                        )));
                    }

                    let error_msg = e.to_string();
                    if error_msg.contains("429") || error_msg.contains("rate") {
                        warn!("Rate limit detected, backing off for {:?}", delay);
                    } else if error_msg.contains("500")
                        || error_msg.contains("502")
                        || error_msg.contains("503")
                        || error_msg.contains("504")
                    {
                        warn!("Server error detected, retrying after {:?}", delay);
                    } else if error_msg.contains("400") || error_msg.contains("invalid") {
                        return Err(InfrastructureError::Sms(format!("Invalid request: {}", e)));
                    }

                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

#[async_trait]
impl SmsDispatcher for TwilioSmsService {
    async fn send(&self, phone_number: &str, message: &str) -> DomainResult<DispatchReceipt> {
        let Some(account) = &self.account else {
            return Err(DomainError::dispatch(
                PROVIDER_NAME,
                format!("Twilio credentials not configured: missing {}", self.missing.join(", ")),
            ));
        };

        check_message_length(message).map_err(|e| e.into_dispatch(PROVIDER_NAME))?;
        let to = to_e164(phone_number).map_err(|e| e.into_dispatch(PROVIDER_NAME))?;

        info!(
            "Sending SMS to {} via Twilio (message length: {} chars)",
            mask_phone_number(&to),
            message.chars().count()
        );

        let sid = self
            .send_with_retry(account, &to, message)
            .await
            .map_err(|e| e.into_dispatch(PROVIDER_NAME))?;

        Ok(DispatchReceipt::delivered(sid))
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }
}
