//! Shared utilities and common types for the HomeMate server
//!
//! This crate provides functionality used across all server modules:
//! - Typed configuration loaded from the environment
//! - Phone number normalization, validation and masking

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CorsConfig, Environment, LoggingConfig, OtpConfig,
    ServerConfig, SmsConfig, SmsProvider, StoreBackend, StoreConfig,
};
pub use utils::phone;
