//! In-process OTP store

use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use hm_core::domain::entities::OtpRecord;
use hm_core::errors::DomainResult;
use hm_core::services::otp::{Clock, OtpStore, SystemClock};

/// Default seconds an expired record is kept so verify can report expiry
const DEFAULT_GRACE_SECONDS: u64 = 300;

/// OTP records in a map keyed by phone number
///
/// Purging judges expiry with the store's own clock, the wall clock unless
/// one is injected with `with_clock`. Share the service's clock when it is
/// not the wall clock.
pub struct MemoryOtpStore {
    records: RwLock<HashMap<String, OtpRecord>>,
    /// How long past `expires_at` a record survives purging
    grace: Duration,
    clock: Arc<dyn Clock>,
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::with_grace_seconds(DEFAULT_GRACE_SECONDS)
    }

    pub fn with_grace_seconds(grace_seconds: u64) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            grace: Duration::seconds(grace_seconds.min(i64::MAX as u64) as i64),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn contains(&self, phone_number: &str) -> bool {
        self.records.read().await.contains_key(phone_number)
    }
}

impl Default for MemoryOtpStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn put(&self, record: OtpRecord) -> DomainResult<()> {
        let cutoff = self.clock.now() - self.grace;
        let mut records = self.records.write().await;

        let before = records.len();
        records.retain(|_, existing| existing.expires_at >= cutoff);
        let purged = before - records.len();
        if purged > 0 {
            debug!(purged = purged, "Purged stale OTP records from memory");
        }

        records.insert(record.phone_number.clone(), record);
        Ok(())
    }

    async fn get(&self, phone_number: &str) -> DomainResult<Option<OtpRecord>> {
        Ok(self.records.read().await.get(phone_number).cloned())
    }

    async fn delete(&self, phone_number: &str) -> DomainResult<()> {
        self.records.write().await.remove(phone_number);
        Ok(())
    }
}
