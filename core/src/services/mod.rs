//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    Clock, DispatchReceipt, KeyedLock, ManualClock, OtpService, OtpServiceConfig,
    OtpStore, SendOtpResult, SmsDispatcher, SystemClock, VerifyOutcome,
};
