use actix_web::{web, HttpResponse};
use serde_json::json;

use hm_core::services::{OtpStore, SmsDispatcher};

use crate::app::{AppState, StoreStatus};

/// Handler for GET /health
pub async fn health_check<S, D>(state: web::Data<AppState<S, D>>) -> HttpResponse
where
    S: OtpStore + StoreStatus + 'static,
    D: SmsDispatcher + 'static,
{
    let service = &state.otp_service;
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "service": "homemate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "store_backend": service.store().backend_name(),
        "sms_provider": service.dispatcher().provider_name(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
