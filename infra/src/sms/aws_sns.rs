//! AWS SNS SMS Service Implementation
//!
//! This module provides SMS sending capabilities using the AWS SNS publish API.
//!
//! ## Features
//!
//! - E.164 normalization before sending
//! - Transactional SMS type by default, optional sender ID
//! - Automatic retry with exponential backoff on throttling and service errors
//! - Security: Phone number masking in logs

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::{config::Region, types::MessageAttributeValue, Client as SnsClient};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use hm_core::errors::{DomainError, DomainResult};
use hm_core::services::otp::{DispatchReceipt, SmsDispatcher};
use hm_shared::config::sms::AwsSnsCredentials;
use hm_shared::phone::mask_phone_number;

use super::{check_message_length, to_e164};
use crate::InfrastructureError;

const PROVIDER_NAME: &str = "AWS SNS";

/// AWS SNS SMS service implementation
pub struct AwsSnsSmsService {
    /// `None` when credentials are missing
    client: Option<SnsClient>,
    /// Environment variables that were not set
    missing: Vec<&'static str>,
    region: String,
    sender_id: Option<String>,
    sms_type: String,
    /// Maximum send attempts
    max_retries: u32,
    /// Initial retry delay in milliseconds
    retry_delay_ms: u64,
}

impl AwsSnsSmsService {
    /// Create a new AWS SNS SMS service
    ///
    /// Incomplete credentials produce an unconfigured service whose sends fail.
    pub async fn new(credentials: &AwsSnsCredentials, max_retries: u32, retry_delay_ms: u64) -> Self {
        let missing = credentials.missing();

        let client = match (&credentials.access_key_id, &credentials.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => {
                let credentials_provider = aws_credential_types::Credentials::new(
                    access_key_id,
                    secret_access_key,
                    None,
                    None,
                    "homemate_sms",
                );

                let aws_config = aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(credentials.region.clone()))
                    .credentials_provider(credentials_provider)
                    .load()
                    .await;

                info!(
                    "AWS SNS SMS service initialized for region: {}",
                    credentials.region
                );

                Some(SnsClient::new(&aws_config))
            }
            _ => {
                warn!(
                    missing = ?missing,
                    "AWS SNS credentials not configured, SMS sends will fail"
                );
                None
            }
        };

        Self {
            client,
            missing,
            region: credentials.region.clone(),
            sender_id: credentials.sender_id.clone(),
            sms_type: credentials.sms_type.clone(),
            max_retries: max_retries.max(1),
            retry_delay_ms,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Create SMS attributes for AWS SNS
    fn create_sms_attributes(&self) -> Result<HashMap<String, MessageAttributeValue>, InfrastructureError> {
        let mut attributes = HashMap::new();

        attributes.insert(
            "AWS.SNS.SMS.SMSType".to_string(),
            string_attribute(&self.sms_type)?,
        );

        // Sender ID is not supported in all regions
        if let Some(ref sender_id) = self.sender_id {
            attributes.insert("AWS.SNS.SMS.SenderID".to_string(), string_attribute(sender_id)?);
        }

        Ok(attributes)
    }

    /// Send SMS with retry logic
    async fn send_with_retry(
        &self,
        client: &SnsClient,
        to: &str,
        message: &str,
    ) -> Result<String, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                "Sending SMS attempt {}/{} to {} via AWS SNS",
                attempts,
                self.max_retries,
                mask_phone_number(to)
            );

            let attributes = self.create_sms_attributes()?;

            let result = client
                .publish()
                .phone_number(to)
                .message(message)
                .set_message_attributes(Some(attributes))
                .send()
                .await;

            match result {
                Ok(response) => {
                    let message_id = response.message_id().unwrap_or("unknown").to_string();

                    info!(
                        "SMS sent successfully to {} via AWS SNS with message ID: {}",
                        mask_phone_number(to),
                        message_id
                    );

                    return Ok(message_id);
                }
                Err(e) => {
                    error!(
                        "Failed to send SMS via AWS SNS (attempt {}/{}): {}",
                        attempts, self.max_retries, e
                    );

                    if attempts >= self.max_retries {
                        return Err(InfrastructureError::Sms(format!(
                            "Failed to send SMS via AWS SNS after {} attempts: {}",
                            self.max_retries, e
                        )));
                    }

                    let error_msg = format!("{:?}", e);
                    if error_msg.contains("Throttling") || error_msg.contains("Rate exceeded") {
                        warn!("Rate limit detected, backing off for {:?}", delay);
                    } else if error_msg.contains("ServiceUnavailable")
                        || error_msg.contains("InternalError")
                        || error_msg.contains("RequestTimeout")
                    {
                        warn!("Service error detected, retrying after {:?}", delay);
                    } else if error_msg.contains("InvalidParameter")
                        || error_msg.contains("InvalidPhoneNumber")
                        || error_msg.contains("ValidationError")
                    {
                        return Err(InfrastructureError::Sms(format!(
                            "Invalid request to AWS SNS: {}",
                            e
                        )));
                    }

                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

fn string_attribute(value: &str) -> Result<MessageAttributeValue, InfrastructureError> {
    MessageAttributeValue::builder()
        .data_type("String")
        .string_value(value)
        .build()
        .map_err(|e| InfrastructureError::Sms(format!("Invalid SMS attribute: {}", e)))
}

#[async_trait]
impl SmsDispatcher for AwsSnsSmsService {
    async fn send(&self, phone_number: &str, message: &str) -> DomainResult<DispatchReceipt> {
        let Some(client) = &self.client else {
            return Err(DomainError::dispatch(
                PROVIDER_NAME,
                format!("AWS SNS credentials not configured: missing {}", self.missing.join(", ")),
            ));
        };

        check_message_length(message).map_err(|e| e.into_dispatch(PROVIDER_NAME))?;
        let to = to_e164(phone_number).map_err(|e| e.into_dispatch(PROVIDER_NAME))?;

        info!(
            "Sending SMS to {} via AWS SNS (message length: {} chars)",
            mask_phone_number(&to),
            message.chars().count()
        );

        let message_id = self
            .send_with_retry(client, &to, message)
            .await
            .map_err(|e| e.into_dispatch(PROVIDER_NAME))?;

        Ok(DispatchReceipt::delivered(message_id))
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }
}
