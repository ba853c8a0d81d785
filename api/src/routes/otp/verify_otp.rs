use actix_web::{web, HttpResponse};
use validator::Validate;

use hm_core::services::{OtpStore, SmsDispatcher};

use crate::app::AppState;
use crate::dto::{VerifyOtpFailureResponse, VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::ApiError;

const FAILURE_MESSAGE: &str = "Failed to verify OTP. Please try again.";

/// Handler for POST /api/auth/verify-otp
///
/// # Request Body
///
/// ```json
/// { "phoneNumber": "+911234567890", "otp": "4821" }
/// ```
///
/// # Response
///
/// 200 with `{ "message": "OTP verified successfully" }`. Any other outcome
/// is a 400 carrying the outcome message, plus `attemptsRemaining` after a
/// wrong code.
pub async fn verify_otp<S, D>(
    state: web::Data<AppState<S, D>>,
    request: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: OtpStore + 'static,
    D: SmsDispatcher + 'static,
{
    let request = request.into_inner().trimmed();
    request
        .validate()
        .map_err(|e| ApiError::from_validation(&e))?;

    let outcome = state
        .otp_service
        .verify_otp(&request.phone_number, &request.otp)
        .await
        .map_err(|e| ApiError::from_domain(e, FAILURE_MESSAGE, state.expose_errors()))?;

    if outcome.is_success() {
        return Ok(HttpResponse::Ok().json(VerifyOtpResponse {
            message: outcome.message().to_string(),
        }));
    }

    Ok(HttpResponse::BadRequest().json(VerifyOtpFailureResponse {
        message: outcome.message().to_string(),
        attempts_remaining: outcome.attempts_remaining(),
    }))
}
