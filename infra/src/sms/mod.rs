//! SMS Service Module
//!
//! This module provides the SMS dispatchers used to deliver OTP codes.
//!
//! ## Features
//!
//! - **Console**: logs messages for development, no network
//! - **Twilio Support**: production SMS via the Twilio API
//! - **AWS SNS Support**: production SMS via AWS SNS publish
//! - **Provider selection**: one `SmsDispatcherKind` chosen at startup
//! - **Security**: phone number masking in logs

use async_trait::async_trait;
use phonenumber::{Mode, PhoneNumber};

use hm_core::errors::DomainResult;
use hm_core::services::otp::{DispatchReceipt, SmsDispatcher};
use hm_shared::{SmsConfig, SmsProvider};

use crate::InfrastructureError;

pub mod console;

// Twilio SMS service (feature-gated)
#[cfg(feature = "twilio-sms")]
pub mod twilio;

// AWS SNS SMS service (feature-gated)
#[cfg(feature = "aws-sns")]
pub mod aws_sns;

pub use console::ConsoleSmsService;

#[cfg(feature = "twilio-sms")]
pub use twilio::TwilioSmsService;

#[cfg(feature = "aws-sns")]
pub use aws_sns::AwsSnsSmsService;

#[cfg(test)]
mod tests;

/// Longest message any provider accepts
pub const MAX_MESSAGE_LENGTH: usize = 1600;

/// Reject messages providers would refuse
pub(crate) fn check_message_length(message: &str) -> Result<(), InfrastructureError> {
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(InfrastructureError::Sms(format!(
            "Message exceeds maximum length of {} characters",
            MAX_MESSAGE_LENGTH
        )));
    }
    Ok(())
}

/// Normalize a phone number to E.164 for remote providers
///
/// Numbers without a leading `+` are taken to already include the country code.
pub fn to_e164(phone: &str) -> Result<String, InfrastructureError> {
    let digits = hm_shared::phone::normalize_phone_number(phone);
    let candidate = if digits.starts_with('+') {
        digits
    } else {
        format!("+{}", digits)
    };

    candidate
        .parse::<PhoneNumber>()
        .map(|parsed| parsed.format().mode(Mode::E164).to_string())
        .map_err(|e| InfrastructureError::Sms(format!("Invalid phone number format: {}", e)))
}

/// The configured SMS dispatcher
pub enum SmsDispatcherKind {
    Console(ConsoleSmsService),
    #[cfg(feature = "twilio-sms")]
    Twilio(TwilioSmsService),
    #[cfg(feature = "aws-sns")]
    AwsSns(AwsSnsSmsService),
}

impl SmsDispatcherKind {
    /// Provider this dispatcher sends through
    pub fn provider(&self) -> SmsProvider {
        match self {
            SmsDispatcherKind::Console(_) => SmsProvider::Console,
            #[cfg(feature = "twilio-sms")]
            SmsDispatcherKind::Twilio(_) => SmsProvider::Twilio,
            #[cfg(feature = "aws-sns")]
            SmsDispatcherKind::AwsSns(_) => SmsProvider::AwsSns,
        }
    }

    /// Whether the dispatcher has everything it needs to send
    pub fn is_configured(&self) -> bool {
        match self {
            SmsDispatcherKind::Console(_) => true,
            #[cfg(feature = "twilio-sms")]
            SmsDispatcherKind::Twilio(service) => service.is_configured(),
            #[cfg(feature = "aws-sns")]
            SmsDispatcherKind::AwsSns(service) => service.is_configured(),
        }
    }
}

#[async_trait]
impl SmsDispatcher for SmsDispatcherKind {
    async fn send(&self, phone_number: &str, message: &str) -> DomainResult<DispatchReceipt> {
        match self {
            SmsDispatcherKind::Console(service) => service.send(phone_number, message).await,
            #[cfg(feature = "twilio-sms")]
            SmsDispatcherKind::Twilio(service) => service.send(phone_number, message).await,
            #[cfg(feature = "aws-sns")]
            SmsDispatcherKind::AwsSns(service) => service.send(phone_number, message).await,
        }
    }

    fn provider_name(&self) -> &str {
        match self {
            SmsDispatcherKind::Console(service) => service.provider_name(),
            #[cfg(feature = "twilio-sms")]
            SmsDispatcherKind::Twilio(service) => service.provider_name(),
            #[cfg(feature = "aws-sns")]
            SmsDispatcherKind::AwsSns(service) => service.provider_name(),
        }
    }
}

/// Create the SMS dispatcher selected by configuration
///
/// Missing credentials do not fail construction; the dispatcher is built
/// unconfigured and every send reports what is missing.
pub async fn create_sms_dispatcher(config: &SmsConfig) -> SmsDispatcherKind {
    match config.provider {
        SmsProvider::Console => {
            SmsDispatcherKind::Console(ConsoleSmsService::new(config.console_output))
        }
        #[cfg(feature = "twilio-sms")]
        SmsProvider::Twilio => SmsDispatcherKind::Twilio(TwilioSmsService::new(
            &config.twilio,
            config.max_retries,
            config.retry_delay_ms,
        )),
        #[cfg(feature = "aws-sns")]
        SmsProvider::AwsSns => SmsDispatcherKind::AwsSns(
            AwsSnsSmsService::new(&config.aws_sns, config.max_retries, config.retry_delay_ms)
                .await,
        ),
        #[allow(unreachable_patterns)]
        other => {
            tracing::warn!(
                "SMS provider '{}' is not compiled in, using console implementation",
                other
            );
            SmsDispatcherKind::Console(ConsoleSmsService::new(config.console_output))
        }
    }
}
