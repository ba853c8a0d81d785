use actix_web::{web, HttpResponse};
use validator::Validate;

use hm_core::services::{OtpStore, SmsDispatcher};

use crate::app::AppState;
use crate::dto::{ResendOtpRequest, SendOtpResponse};
use crate::handlers::ApiError;

const FAILURE_MESSAGE: &str = "Failed to resend OTP. Please try again.";

/// Handler for POST /api/auth/resend-otp
///
/// Same contract as send-otp. Resends are not rate limited.
pub async fn resend_otp<S, D>(
    state: web::Data<AppState<S, D>>,
    request: web::Json<ResendOtpRequest>,
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
        .resend_otp(&request.phone_number)
        .await
        .map_err(|e| ApiError::from_domain(e, FAILURE_MESSAGE, state.expose_errors()))?;

    Ok(HttpResponse::Ok().json(SendOtpResponse::from(result)))
}
