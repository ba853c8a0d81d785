//! OTP record stores
//!
//! - `MemoryOtpStore`: in-process map, used alone or as the fallback
//! - `RedisOtpStore`: durable store with expiring keys
//! - `FallbackOtpStore`: the store handed to the service; durable first,
//!   in-memory while the durable backend is unreachable

pub mod fallback_store;
pub mod memory_store;
pub mod redis_store;

#[cfg(test)]
mod tests;

pub use fallback_store::{durable_timeout_for, FallbackOtpStore};
pub use memory_store::MemoryOtpStore;
pub use redis_store::RedisOtpStore;

use hm_shared::{StoreBackend, StoreConfig};
use std::time::Duration;
use tracing::{info, warn};

use crate::cache::RedisClient;

/// Build the OTP store selected by configuration
///
/// A Redis backend that cannot be reached at startup degrades to the
/// in-memory store instead of aborting. `store_timeout` is the service's
/// bound per store call; Redis calls are cut shorter so an outage falls back
/// to memory before that bound is hit.
pub async fn create_otp_store(config: &StoreConfig, store_timeout: Duration) -> FallbackOtpStore {
    match config.backend {
        StoreBackend::Memory => {
            info!(backend = "memory", "Using in-memory OTP store");
            FallbackOtpStore::memory_only(MemoryOtpStore::with_grace_seconds(
                config.expired_grace_seconds,
            ))
        }
        StoreBackend::Redis => match RedisClient::new(config.redis.clone()).await {
            Ok(client) => {
                let durable_timeout = durable_timeout_for(store_timeout);
                info!(
                    backend = "redis",
                    durable_timeout_ms = durable_timeout.as_millis() as u64,
                    "Using Redis OTP store with in-memory fallback"
                );
                FallbackOtpStore::for_store_timeout(
                    RedisOtpStore::new(client, config.expired_grace_seconds),
                    MemoryOtpStore::with_grace_seconds(config.expired_grace_seconds),
                    store_timeout,
                )
            }
            Err(e) => {
                warn!(
                    error = %e,
                    backend = "memory",
                    "Redis unavailable at startup, OTP records will be kept in memory"
                );
                FallbackOtpStore::memory_only(MemoryOtpStore::with_grace_seconds(
                    config.expired_grace_seconds,
                ))
            }
        },
    }
}
