//! Application state and factory
//!
//! This module holds the state shared by the handlers and builds the
//! Actix-web application around it.

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse};
use std::sync::Arc;

use hm_core::services::{OtpService, OtpStore, SmsDispatcher};
use hm_infra::{FallbackOtpStore, MemoryOtpStore};
use hm_shared::Environment;

use crate::dto::ErrorResponse;
use crate::handlers::json_error_handler;
use crate::routes::{health::health_check, otp};

/// Application state shared by all handlers
pub struct AppState<S, D>
where
    S: OtpStore,
    D: SmsDispatcher,
{
    pub otp_service: Arc<OtpService<S, D>>,
    pub environment: Environment,
}

impl<S, D> AppState<S, D>
where
    S: OtpStore,
    D: SmsDispatcher,
{
    pub fn new(otp_service: Arc<OtpService<S, D>>, environment: Environment) -> Self {
        Self {
            otp_service,
            environment,
        }
    }

    /// Whether 500 bodies carry the underlying error
    pub fn expose_errors(&self) -> bool {
        self.environment.is_development()
    }
}

/// Store backend reported by the health check
pub trait StoreStatus {
    fn backend_name(&self) -> String;
}

impl<D: OtpStore> StoreStatus for FallbackOtpStore<D> {
    fn backend_name(&self) -> String {
        self.current_backend().to_string()
    }
}

impl StoreStatus for MemoryOtpStore {
    fn backend_name(&self) -> String {
        "memory".to_string()
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<S, D>(
    app_state: web::Data<AppState<S, D>>,
    cors: Cors,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: OtpStore + StoreStatus + 'static,
    D: SmsDispatcher + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(cors)
        .wrap(Logger::default())
        .route("/health", web::get().to(health_check::<S, D>))
        .service(
            web::scope("/api/auth")
                .route("/send-otp", web::post().to(otp::send_otp::<S, D>))
                .route("/verify-otp", web::post().to(otp::verify_otp::<S, D>))
                .route("/resend-otp", web::post().to(otp::resend_otp::<S, D>)),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Route not found"))
}
