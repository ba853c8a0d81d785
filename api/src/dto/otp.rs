//! OTP request and response bodies

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use hm_shared::phone::is_valid_phone;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Phone number is required"),
        custom(function = "validate_phone_format")
    )]
    pub phone_number: String,
}

impl SendOtpRequest {
    pub fn trimmed(self) -> Self {
        Self {
            phone_number: self.phone_number.trim().to_string(),
        }
    }
}

/// Resend takes the same body as send
pub type ResendOtpRequest = SendOtpRequest;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,

    #[serde(default)]
    #[validate(
        length(equal = 4, message = "OTP must be 4 digits"),
        custom(function = "validate_numeric")
    )]
    pub otp: String,
}

impl VerifyOtpRequest {
    pub fn trimmed(self) -> Self {
        Self {
            phone_number: self.phone_number.trim().to_string(),
            otp: self.otp.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    pub message: String,
    /// Seconds until the code expires
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpFailureResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_remaining: Option<u32>,
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

// Empty input is reported by the length rule
fn validate_phone_format(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() || is_valid_phone(phone) {
        Ok(())
    } else {
        Err(field_error("phone", "Please provide a valid phone number"))
    }
}

fn validate_numeric(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(field_error("numeric", "OTP must be numeric"))
    }
}
