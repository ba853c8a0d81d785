use actix_web::{web, HttpResponse};
use validator::Validate;

use hm_core::services::{OtpStore, SmsDispatcher};

use crate::app::AppState;
use crate::dto::{SendOtpRequest, SendOtpResponse};
use crate::handlers::ApiError;

const FAILURE_MESSAGE: &str = "Failed to send OTP. Please try again.";

/// Handler for POST /api/auth/send-otp
///
/// Generates a fresh code for the number, replacing any pending one, and
/// sends it by SMS.
///
/// # Request Body
///
/// ```json
/// { "phoneNumber": "+911234567890" }
/// ```
///
/// # Response
///
/// ```json
/// { "message": "OTP sent successfully", "expiresIn": 600 }
/// ```
pub async fn send_otp<S, D>(
    state: web::Data<AppState<S, D>>,
    request: web::Json<SendOtpRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: OtpStore + 'static,
    D: SmsDispatcher + 'static,
{
    let request = request.into_inner().trimmed();
    request
        .validate()
        .map_err(|e| ApiError::from_validation(&e))?;

    let result = state
        .otp_service
        .send_otp(&request.phone_number)
        .await
        .map_err(|e| ApiError::from_domain(e, FAILURE_MESSAGE, state.expose_errors()))?;

    Ok(HttpResponse::Ok().json(SendOtpResponse::from(result)))
}
