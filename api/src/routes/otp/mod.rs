//! Phone verification routes under `/api/auth`

pub mod resend_otp;
pub mod send_otp;
pub mod verify_otp;

pub use resend_otp::resend_otp;
pub use send_otp::send_otp;
pub use verify_otp::verify_otp;

use crate::dto::SendOtpResponse;
use hm_core::services::SendOtpResult;

impl From<SendOtpResult> for SendOtpResponse {
    fn from(result: SendOtpResult) -> Self {
        Self {
            message: result.message,
            expires_in: result.expires_in,
        }
    }
}
