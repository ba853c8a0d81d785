//! Redis-backed OTP store

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use hm_core::domain::entities::OtpRecord;
use hm_core::errors::DomainResult;
use hm_core::services::otp::OtpStore;
use hm_shared::phone::mask_phone_number;

use crate::cache::RedisClient;
use crate::InfrastructureError;

/// Redis key prefix for OTP records
const OTP_KEY_PREFIX: &str = "otp:record";

/// OTP records stored as JSON under `otp:record:<phone>`
///
/// Keys expire a grace window after the record itself, so a late verify
/// still finds the record and reports it as expired.
#[derive(Clone)]
pub struct RedisOtpStore {
    client: RedisClient,
    grace_seconds: u64,
}

impl RedisOtpStore {
    pub fn new(client: RedisClient, grace_seconds: u64) -> Self {
        Self {
            client,
            grace_seconds,
        }
    }

    fn format_key(&self, phone_number: &str) -> String {
        self.client
            .make_key(&format!("{}:{}", OTP_KEY_PREFIX, phone_number))
    }

    /// Seconds the key should live for `record`
    fn ttl_for(&self, record: &OtpRecord) -> u64 {
        let remaining = (record.expires_at - Utc::now()).num_seconds().max(0) as u64;
        remaining.saturating_add(self.grace_seconds).max(1)
    }

    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        self.client.health_check().await
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn put(&self, record: OtpRecord) -> DomainResult<()> {
        let key = self.format_key(&record.phone_number);
        let ttl = self.ttl_for(&record);
        let json = serde_json::to_string(&record).map_err(InfrastructureError::from)?;

        self.client.set_with_expiry(&key, &json, ttl).await?;

        debug!(
            phone = %mask_phone_number(&record.phone_number),
            ttl_seconds = ttl,
            attempts = record.attempts,
            "Stored OTP record in Redis"
        );

        Ok(())
    }

    async fn get(&self, phone_number: &str) -> DomainResult<Option<OtpRecord>> {
        let key = self.format_key(phone_number);

        match self.client.get(&key).await? {
            Some(json) => {
                let record: OtpRecord =
                    serde_json::from_str(&json).map_err(InfrastructureError::from)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, phone_number: &str) -> DomainResult<()> {
        let key = self.format_key(phone_number);
        self.client.delete(&key).await?;
        Ok(())
    }
}
