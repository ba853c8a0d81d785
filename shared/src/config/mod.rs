//! Configuration module with business-specific sub-modules
//!
//! - `cache` - OTP store backend selection and Redis configuration
//! - `environment` - Environment detection and logging configuration
//! - `otp` - Code lifetime, attempt limit and call timeouts
//! - `server` - HTTP server and CORS configuration
//! - `sms` - SMS provider selection and credentials

pub mod cache;
pub mod environment;
pub mod otp;
pub mod server;
pub mod sms;

use serde::{Deserialize, Serialize};

pub use cache::{CacheConfig, StoreBackend, StoreConfig};
pub use environment::{Environment, LoggingConfig};
pub use otp::OtpConfig;
pub use server::{CorsConfig, ServerConfig};
pub use sms::{AwsSnsCredentials, SmsConfig, SmsProvider, TwilioCredentials};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// OTP store configuration
    pub store: StoreConfig,

    /// SMS provider configuration
    pub sms: SmsConfig,

    /// OTP lifecycle configuration
    pub otp: OtpConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            sms: SmsConfig::default(),
            otp: OtpConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first when present;
    /// variables already set in the environment take precedence.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            store: StoreConfig::from_env(),
            sms: SmsConfig::from_env(),
            otp: OtpConfig::from_env(),
            cors: CorsConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}

/// Read an environment variable and parse it, falling back to `default`
/// when the variable is missing or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read an environment variable, treating empty values as unset.
pub(crate) fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
