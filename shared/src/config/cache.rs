//! OTP store and Redis cache configuration

use serde::{Deserialize, Serialize};

/// Which backend holds pending OTP records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Redis, with an in-process fallback while Redis is unreachable
    #[default]
    Redis,
    /// In-process map only
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" | "in-memory" | "inmemory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid OTP store backend: {}", s)),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Redis => write!(f, "redis"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Maximum retry attempts for a single Redis command
    pub max_retries: u32,

    /// Base delay between retries in milliseconds
    pub retry_delay_ms: u64,

    /// Key prefix for all cache keys
    #[serde(default)]
    pub key_prefix: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
            max_retries: 2,
            retry_delay_ms: 50,
            key_prefix: Some("homemate".to_string()),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: super::env_non_empty("REDIS_URL").unwrap_or(defaults.url),
            connection_timeout: super::env_or("REDIS_CONNECTION_TIMEOUT", defaults.connection_timeout),
            max_retries: super::env_or("REDIS_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: super::env_or("REDIS_RETRY_DELAY_MS", defaults.retry_delay_ms),
            key_prefix: super::env_non_empty("REDIS_KEY_PREFIX").or(defaults.key_prefix),
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

/// OTP store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Selected backend
    pub backend: StoreBackend,

    /// Redis settings, used when `backend` is `Redis`
    pub redis: CacheConfig,

    /// Seconds an expired record is kept in Redis past its expiry so that a
    /// late verify reports "expired" instead of "not found"
    pub expired_grace_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            redis: CacheConfig::default(),
            expired_grace_seconds: 300,
        }
    }
}

impl StoreConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: super::env_or("OTP_STORE", defaults.backend),
            redis: CacheConfig::from_env(),
            expired_grace_seconds: super::env_or("OTP_EXPIRED_GRACE_SECONDS", defaults.expired_grace_seconds),
        }
    }

    /// In-process store only, as used by tests and local demos
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.make_key("otp:record:+15550001111"), "homemate:otp:record:+15550001111");
    }

    #[test]
    fn test_cache_key_without_prefix() {
        let mut config = CacheConfig::new("redis://cache:6379");
        config.key_prefix = None;
        assert_eq!(config.make_key("otp:record:1"), "otp:record:1");
        assert_eq!(config.with_prefix("hm").make_key("k"), "hm:k");
    }

    #[test]
    fn test_store_backend_parsing() {
        assert_eq!("Redis".parse::<StoreBackend>().unwrap(), StoreBackend::Redis);
        assert_eq!("in-memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("mongo".parse::<StoreBackend>().is_err());
        assert_eq!(StoreConfig::memory().backend, StoreBackend::Memory);
    }
}
