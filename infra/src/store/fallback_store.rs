//! Durable-first OTP store with in-memory fallback

use async_trait::async_trait;
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

use hm_core::domain::entities::OtpRecord;
use hm_core::errors::{DomainError, DomainResult};
use hm_core::services::otp::OtpStore;
use hm_shared::phone::mask_phone_number;
use hm_shared::StoreBackend;

use super::memory_store::MemoryOtpStore;
use super::redis_store::RedisOtpStore;

/// Bound for a single durable call before falling back
const DEFAULT_DURABLE_TIMEOUT: Duration = Duration::from_millis(1_000);

/// Durable call bound that fits inside the caller's own store timeout.
///
/// Half of `store_timeout`, leaving the other half for the memory write that
/// follows a durable failure.
pub fn durable_timeout_for(store_timeout: Duration) -> Duration {
    (store_timeout / 2).max(Duration::from_millis(1))
}

/// OTP store that writes to a durable backend and keeps records in memory
/// while that backend is unreachable.
///
/// A record lives in exactly one place that `get` trusts:
/// - a memory copy always wins, it was written after the durable one failed;
/// - a phone number whose durable copy may be outdated is tracked as stale
///   and its durable copy is ignored until it has been deleted.
pub struct FallbackOtpStore<D = RedisOtpStore>
where
    D: OtpStore,
{
    durable: Option<D>,
    memory: MemoryOtpStore,
    /// Phone numbers whose durable copy must not be read
    stale_durable: Mutex<HashSet<String>>,
    durable_healthy: AtomicBool,
    durable_timeout: Duration,
}

impl<D> FallbackOtpStore<D>
where
    D: OtpStore,
{
    /// Durable store backed by `memory` during outages
    pub fn new(durable: D, memory: MemoryOtpStore) -> Self {
        Self {
            durable: Some(durable),
            memory,
            stale_durable: Mutex::new(HashSet::new()),
            durable_healthy: AtomicBool::new(true),
            durable_timeout: DEFAULT_DURABLE_TIMEOUT,
        }
    }

    /// Durable store whose calls give up in time for the memory fallback to
    /// finish within `store_timeout`
    pub fn for_store_timeout(durable: D, memory: MemoryOtpStore, store_timeout: Duration) -> Self {
        Self::new(durable, memory).with_durable_timeout(durable_timeout_for(store_timeout))
    }

    /// In-memory only
    pub fn memory_only(memory: MemoryOtpStore) -> Self {
        Self {
            durable: None,
            memory,
            stale_durable: Mutex::new(HashSet::new()),
            durable_healthy: AtomicBool::new(false),
            durable_timeout: DEFAULT_DURABLE_TIMEOUT,
        }
    }

    pub fn with_durable_timeout(mut self, timeout: Duration) -> Self {
        self.durable_timeout = timeout;
        self
    }

    /// Backend currently holding new records
    pub fn current_backend(&self) -> StoreBackend {
        if self.durable.is_some() && self.durable_healthy.load(Ordering::SeqCst) {
            StoreBackend::Redis
        } else {
            StoreBackend::Memory
        }
    }

    pub fn has_durable_backend(&self) -> bool {
        self.durable.is_some()
    }

    pub fn durable_timeout(&self) -> Duration {
        self.durable_timeout
    }

    pub fn memory(&self) -> &MemoryOtpStore {
        &self.memory
    }

    fn is_stale(&self, phone_number: &str) -> bool {
        self.stale_durable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(phone_number)
    }

    fn mark_stale(&self, phone_number: &str) {
        self.stale_durable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(phone_number.to_string());
    }

    fn clear_stale(&self, phone_number: &str) {
        self.stale_durable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(phone_number);
    }

    /// Run a durable call with the fallback bound, tracking backend health
    async fn durable_call<T, F>(&self, operation: &'static str, fut: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        let result = match tokio::time::timeout(self.durable_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::store(format!(
                "{} timed out after {}ms",
                operation,
                self.durable_timeout.as_millis()
            ))),
        };

        match &result {
            Ok(_) => {
                if !self.durable_healthy.swap(true, Ordering::SeqCst) {
                    info!(backend = "redis", event = "store_recovered", "Durable OTP store reachable again");
                }
            }
            Err(e) => {
                if self.durable_healthy.swap(false, Ordering::SeqCst) {
                    warn!(
                        backend = "memory",
                        event = "store_degraded",
                        operation = operation,
                        error = %e,
                        "Durable OTP store unreachable, falling back to memory"
                    );
                }
            }
        }

        result
    }

    /// Try to remove an outdated durable copy; true once it is gone
    async fn purge_stale(&self, durable: &D, phone_number: &str) -> bool {
        match self.durable_call("store.delete", durable.delete(phone_number)).await {
            Ok(()) => {
                self.clear_stale(phone_number);
                debug!(
                    phone = %mask_phone_number(phone_number),
                    "Purged stale durable OTP record"
                );
                true
            }
            Err(_) => false,
        }
    }
}

#[async_trait]
impl<D> OtpStore for FallbackOtpStore<D>
where
    D: OtpStore,
{
    async fn put(&self, record: OtpRecord) -> DomainResult<()> {
        let Some(durable) = &self.durable else {
            return self.memory.put(record).await;
        };

        let phone = record.phone_number.clone();

        match self.durable_call("store.put", durable.put(record.clone())).await {
            Ok(()) => {
                self.clear_stale(&phone);
                self.memory.delete(&phone).await
            }
            Err(e) => {
                warn!(
                    phone = %mask_phone_number(&phone),
                    error = %e,
                    "Storing OTP record in memory"
                );
                self.mark_stale(&phone);
                self.memory.put(record).await
            }
        }
    }

    async fn get(&self, phone_number: &str) -> DomainResult<Option<OtpRecord>> {
        if let Some(record) = self.memory.get(phone_number).await? {
            return Ok(Some(record));
        }

        let Some(durable) = &self.durable else {
            return Ok(None);
        };

        if self.is_stale(phone_number) {
            // The durable copy was superseded or deleted during an outage
            self.purge_stale(durable, phone_number).await;
            return Ok(None);
        }

        match self.durable_call("store.get", durable.get(phone_number)).await {
            Ok(record) => Ok(record),
            Err(e) => {
                warn!(
                    phone = %mask_phone_number(phone_number),
                    error = %e,
                    "Durable OTP lookup failed, treating as not found"
                );
                Ok(None)
            }
        }
    }

    async fn delete(&self, phone_number: &str) -> DomainResult<()> {
        self.memory.delete(phone_number).await?;

        if let Some(durable) = &self.durable {
            if let Err(e) = self.durable_call("store.delete", durable.delete(phone_number)).await {
                warn!(
                    phone = %mask_phone_number(phone_number),
                    error = %e,
                    "Failed to delete durable OTP record, marking stale"
                );
                self.mark_stale(phone_number);
            } else {
                self.clear_stale(phone_number);
            }
        }

        Ok(())
    }
}
