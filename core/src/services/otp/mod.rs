//! Phone number OTP service module
//!
//! This module provides the send / verify / resend flow:
//! - Code generation and persistence through an `OtpStore`
//! - Delivery through an `SmsDispatcher`
//! - Attempt and expiry enforcement with per-phone serialization

mod clock;
mod config;
mod key_lock;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::OtpServiceConfig;
pub use key_lock::{KeyedLock, KeyedLockGuard};
pub use service::OtpService;
pub use traits::{OtpStore, SmsDispatcher};
pub use types::{DispatchReceipt, SendOtpResult, VerifyOutcome};
