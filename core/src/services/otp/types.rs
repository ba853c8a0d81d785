//! Result types for the OTP service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Acknowledgement from an SMS provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    pub success: bool,
    /// Provider message id (Twilio SID, SNS message id, or `dev-<uuid>`)
    pub message_id: String,
}

impl DispatchReceipt {
    pub fn delivered(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: message_id.into(),
        }
    }
}

/// Result of a successful send or resend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpResult {
    pub message: String,
    /// Code lifetime in seconds
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    pub message_id: String,
}

impl SendOtpResult {
    pub const MESSAGE: &'static str = "OTP sent successfully";
}

/// Terminal outcome of a verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerifyOutcome {
    Verified,
    NotFound,
    Expired,
    Exhausted,
    Mismatch { attempts_remaining: u32 },
}

impl VerifyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, VerifyOutcome::Verified)
    }

    pub fn attempts_remaining(&self) -> Option<u32> {
        match self {
            VerifyOutcome::Mismatch { attempts_remaining } => Some(*attempts_remaining),
            _ => None,
        }
    }

    /// User-facing message
    pub fn message(&self) -> &'static str {
        match self {
            VerifyOutcome::Verified => "OTP verified successfully",
            VerifyOutcome::NotFound => "OTP not found or already used",
            VerifyOutcome::Expired => "OTP has expired. Please request a new one.",
            VerifyOutcome::Exhausted => {
                "Maximum verification attempts exceeded. Please request a new OTP."
            }
            VerifyOutcome::Mismatch { .. } => "Invalid OTP. Please try again.",
        }
    }

    /// Short label for structured logs
    pub fn label(&self) -> &'static str {
        match self {
            VerifyOutcome::Verified => "verified",
            VerifyOutcome::NotFound => "not_found",
            VerifyOutcome::Expired => "expired",
            VerifyOutcome::Exhausted => "exhausted",
            VerifyOutcome::Mismatch { .. } => "mismatch",
        }
    }
}
