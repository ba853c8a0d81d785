//! One-time password record for phone number verification.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};

/// Maximum number of verification attempts allowed per issued code
pub const MAX_ATTEMPTS: u32 = 5;

/// Length of the verification code
pub const CODE_LENGTH: usize = 4;

/// Default expiration time for verification codes (10 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 10;

/// A pending OTP issued to a phone number.
///
/// At most one record exists per phone number; the phone number is the key
/// in every store implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Phone number the code was sent to (store key)
    pub phone_number: String,

    /// The 4-digit numeric code
    pub code: String,

    /// When the code was issued
    pub created_at: DateTime<Utc>,

    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,

    /// Verification attempts made so far
    pub attempts: u32,

    /// Whether the code has been successfully verified
    pub verified: bool,
}

impl OtpRecord {
    /// Issue a fresh record at `now` that lives for `lifetime`
    pub fn issue(
        phone_number: impl Into<String>,
        code: impl Into<String>,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            phone_number: phone_number.into(),
            code: code.into(),
            created_at: now,
            expires_at: now + lifetime,
            attempts: 0,
            verified: false,
        }
    }

    /// Generate a code uniformly over `1000..=9999` using the OS CSPRNG
    pub fn generate_code() -> String {
        let code: u16 = OsRng.gen_range(1000..=9999);
        code.to_string()
    }

    /// Whether `code` has the shape of an issued code (exactly four ASCII digits)
    pub fn is_well_formed_code(code: &str) -> bool {
        code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
    }

    /// Strictly after `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }

    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempts)
    }

    /// Count one verification attempt and return the new total
    pub fn record_attempt(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    /// Compare a candidate against the stored code in constant time
    pub fn matches(&self, candidate: &str) -> bool {
        self.code.len() == candidate.len() && constant_time_eq(self.code.as_bytes(), candidate.as_bytes())
    }

    pub fn mark_verified(&mut self) {
        self.verified = true;
    }

    /// Seconds left before expiry, zero once expired
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}
