//! Configuration for the OTP service

use std::time::Duration;

use hm_shared::OtpConfig;

use crate::domain::entities::{DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS};

/// Configuration for the OTP service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Minutes an issued code stays valid
    pub code_expiration_minutes: i64,
    /// Verification attempts allowed per issued code
    pub max_attempts: u32,
    /// Bound for each store call
    pub store_timeout: Duration,
    /// Bound for each SMS dispatch
    pub dispatch_timeout: Duration,
    /// Product name used in the SMS body
    pub app_name: String,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            max_attempts: MAX_ATTEMPTS,
            store_timeout: Duration::from_millis(2_000),
            dispatch_timeout: Duration::from_millis(15_000),
            app_name: "HomeMate".to_string(),
        }
    }
}

impl From<&OtpConfig> for OtpServiceConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            code_expiration_minutes: config.expiry_minutes,
            max_attempts: config.max_attempts,
            store_timeout: Duration::from_millis(config.store_timeout_ms),
            dispatch_timeout: Duration::from_millis(config.dispatch_timeout_ms),
            ..Self::default()
        }
    }
}

impl OtpServiceConfig {
    /// Code lifetime in seconds, as reported to clients
    pub fn expires_in_seconds(&self) -> i64 {
        self.code_expiration_minutes * 60
    }

    /// SMS body carrying the code
    pub fn render_message(&self, code: &str) -> String {
        format!(
            "Your {} verification code is {}. Valid for {} minutes.",
            self.app_name, code, self.code_expiration_minutes
        )
    }
}
