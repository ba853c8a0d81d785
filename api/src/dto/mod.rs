//! Request and response bodies

pub mod error;
pub mod otp;

pub use error::{ErrorResponse, FieldError, ValidationFailedResponse};
pub use otp::{
    ResendOtpRequest, SendOtpRequest, SendOtpResponse, VerifyOtpFailureResponse, VerifyOtpRequest,
    VerifyOtpResponse,
};
