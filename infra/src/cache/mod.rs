//! Cache module for Redis-based caching
//!
//! This module provides the Redis client used by the durable OTP store,
//! including reconnection, retry logic and the basic key operations.

pub mod redis_client;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;

// Re-export commonly used types
pub use hm_shared::CacheConfig;
