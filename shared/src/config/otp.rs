//! OTP lifecycle configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smallest store bound accepted from the environment; the Redis fallback
/// needs room for a durable attempt and a memory write inside it
const MIN_STORE_TIMEOUT_MS: u64 = 50;

/// Code lifetime, attempt limit and infrastructure call bounds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Minutes before an issued code expires
    pub expiry_minutes: i64,

    /// Verification attempts allowed per issued code
    pub max_attempts: u32,

    /// Upper bound for a single store call, in milliseconds
    pub store_timeout_ms: u64,

    /// Upper bound for a single SMS dispatch, in milliseconds
    pub dispatch_timeout_ms: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            expiry_minutes: 10,
            max_attempts: 5,
            store_timeout_ms: 2_000,
            dispatch_timeout_ms: 15_000,
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            expiry_minutes: super::env_or("OTP_EXPIRY_MINUTES", defaults.expiry_minutes).max(1),
            max_attempts: super::env_or("OTP_MAX_ATTEMPTS", defaults.max_attempts).max(1),
            store_timeout_ms: super::env_or("OTP_STORE_TIMEOUT_MS", defaults.store_timeout_ms)
                .max(MIN_STORE_TIMEOUT_MS),
            dispatch_timeout_ms: super::env_or("OTP_DISPATCH_TIMEOUT_MS", defaults.dispatch_timeout_ms),
        }
    }

    /// Bound for a single store call
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Code lifetime in seconds, as reported to clients
    pub fn expires_in_seconds(&self) -> i64 {
        self.expiry_minutes * 60
    }
}
