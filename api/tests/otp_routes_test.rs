//! HTTP tests for the phone verification routes

use actix_web::{http::StatusCode, test, web};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use hm_api::{create_app, middleware::create_cors, AppState};
use hm_core::domain::entities::OtpRecord;
use hm_core::errors::{DomainError, DomainResult};
use hm_core::services::{DispatchReceipt, OtpService, OtpServiceConfig, SmsDispatcher};
use hm_infra::{FallbackOtpStore, MemoryOtpStore};
use hm_shared::{CorsConfig, Environment};

const PHONE: &str = "+911234567890";

/// Dispatcher that keeps every message so tests can read the code
#[derive(Default)]
struct CapturingDispatcher {
    messages: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl CapturingDispatcher {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn latest_code(&self) -> String {
        let messages = self.messages.lock().unwrap();
        let (_, body) = messages.last().expect("no message sent");
        body.split_whitespace()
            .map(|word| word.trim_end_matches('.'))
            .find(|word| OtpRecord::is_well_formed_code(word))
            .expect("message carries a code")
            .to_string()
    }

    fn sent(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl SmsDispatcher for CapturingDispatcher {
    async fn send(&self, phone_number: &str, message: &str) -> DomainResult<DispatchReceipt> {
        if self.fail {
            return Err(DomainError::dispatch("Capture", "provider rejected the message"));
        }
        self.messages
            .lock()
            .unwrap()
            .push((phone_number.to_string(), message.to_string()));
        Ok(DispatchReceipt::delivered("capture-1"))
    }

    fn provider_name(&self) -> &str {
        "Capture"
    }
}

type TestState = AppState<FallbackOtpStore, CapturingDispatcher>;

fn state_with(dispatcher: Arc<CapturingDispatcher>, environment: Environment) -> web::Data<TestState> {
    let store = Arc::new(FallbackOtpStore::memory_only(MemoryOtpStore::new()));
    let service = OtpService::new(store, dispatcher, OtpServiceConfig::default());
    web::Data::new(AppState::new(Arc::new(service), environment))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(create_app(
            $state.clone(),
            create_cors(Environment::Development, &CorsConfig::default()),
        ))
        .await
    };
}

macro_rules! post_json {
    ($app:expr, $path:expr, $body:expr $(,)?) => {{
        let req = test::TestRequest::post().uri($path).set_json($body).to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn test_send_otp_success() {
    let dispatcher = Arc::new(CapturingDispatcher::default());
    let state = state_with(dispatcher.clone(), Environment::Development);
    let app = init_app!(state);

    let (status, body) = post_json!(app, "/api/auth/send-otp", json!({ "phoneNumber": PHONE }));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OTP sent successfully");
    assert_eq!(body["expiresIn"], 600);
    assert_eq!(dispatcher.sent(), 1);
}

#[actix_web::test]
async fn test_send_otp_requires_phone_number() {
    let state = state_with(Arc::new(CapturingDispatcher::default()), Environment::Development);
    let app = init_app!(state);

    let (status, body) = post_json!(app, "/api/auth/send-otp", json!({}));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][0]["msg"], "Phone number is required");
    assert_eq!(body["errors"][0]["path"], "phoneNumber");
    assert_eq!(body["errors"][0]["type"], "field");
    assert_eq!(body["errors"][0]["location"], "body");
}

#[actix_web::test]
async fn test_send_otp_rejects_invalid_phone() {
    let dispatcher = Arc::new(CapturingDispatcher::default());
    let state = state_with(dispatcher.clone(), Environment::Development);
    let app = init_app!(state);

    let (status, body) =
        post_json!(app, "/api/auth/send-otp", json!({ "phoneNumber": "call me" }));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["msg"], "Please provide a valid phone number");
    assert_eq!(dispatcher.sent(), 0);
}

#[actix_web::test]
async fn test_send_then_verify_flow() {
    let dispatcher = Arc::new(CapturingDispatcher::default());
    let state = state_with(dispatcher.clone(), Environment::Development);
    let app = init_app!(state);

    post_json!(app, "/api/auth/send-otp", json!({ "phoneNumber": PHONE }));
    let code = dispatcher.latest_code();

    let (status, body) = post_json!(
        app,
        "/api/auth/verify-otp",
        json!({ "phoneNumber": PHONE, "otp": code }),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OTP verified successfully");
    assert!(body.get("attemptsRemaining").is_none());

    // The record is consumed by a successful verification
    let (status, body) = post_json!(
        app,
        "/api/auth/verify-otp",
        json!({ "phoneNumber": PHONE, "otp": code }),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "OTP not found or already used");
}

#[actix_web::test]
async fn test_wrong_code_reports_attempts_remaining() {
    let dispatcher = Arc::new(CapturingDispatcher::default());
    let state = state_with(dispatcher.clone(), Environment::Development);
    let app = init_app!(state);

    post_json!(app, "/api/auth/send-otp", json!({ "phoneNumber": PHONE }));
    let code = dispatcher.latest_code();
    let wrong = if code == "1111" { "2222" } else { "1111" };

    for expected in (1..=4).rev() {
        let (status, body) = post_json!(
            app,
            "/api/auth/verify-otp",
            json!({ "phoneNumber": PHONE, "otp": wrong }),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid OTP. Please try again.");
        assert_eq!(body["attemptsRemaining"], expected);
    }

    let (status, body) = post_json!(
        app,
        "/api/auth/verify-otp",
        json!({ "phoneNumber": PHONE, "otp": wrong }),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Maximum verification attempts exceeded. Please request a new OTP."
    );
}

#[actix_web::test]
async fn test_verify_otp_validation() {
    let state = state_with(Arc::new(CapturingDispatcher::default()), Environment::Development);
    let app = init_app!(state);

    let (status, body) = post_json!(
        app,
        "/api/auth/verify-otp",
        json!({ "phoneNumber": PHONE, "otp": "12a4" }),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][0]["path"], "otp");
    assert_eq!(body["errors"][0]["msg"], "OTP must be numeric");

    let (status, body) = post_json!(
        app,
        "/api/auth/verify-otp",
        json!({ "phoneNumber": PHONE, "otp": "123" }),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["msg"], "OTP must be 4 digits");
}

#[actix_web::test]
async fn test_resend_replaces_code() {
    let dispatcher = Arc::new(CapturingDispatcher::default());
    let state = state_with(dispatcher.clone(), Environment::Development);
    let app = init_app!(state);

    post_json!(app, "/api/auth/send-otp", json!({ "phoneNumber": PHONE }));
    let (status, body) =
        post_json!(app, "/api/auth/resend-otp", json!({ "phoneNumber": PHONE }));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expiresIn"], 600);
    assert_eq!(dispatcher.sent(), 2);

    let code = dispatcher.latest_code();
    let (status, _) = post_json!(
        app,
        "/api/auth/verify-otp",
        json!({ "phoneNumber": PHONE, "otp": code }),
    );
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_dispatch_failure_is_server_error() {
    let state = state_with(Arc::new(CapturingDispatcher::failing()), Environment::Development);
    let app = init_app!(state);

    let (status, body) = post_json!(app, "/api/auth/send-otp", json!({ "phoneNumber": PHONE }));

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "Failed to send SMS via Capture: provider rejected the message"
    );
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_error_detail_hidden_in_production() {
    let state = state_with(Arc::new(CapturingDispatcher::failing()), Environment::Production);
    let app = init_app!(state);

    let (status, body) = post_json!(app, "/api/auth/send-otp", json!({ "phoneNumber": PHONE }));

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("error").is_none());
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let state = state_with(Arc::new(CapturingDispatcher::default()), Environment::Development);
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/send-otp")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Validation failed");
}

#[actix_web::test]
async fn test_health_check() {
    let state = state_with(Arc::new(CapturingDispatcher::default()), Environment::Development);
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "OK");
    assert_eq!(body["store_backend"], "memory");
    assert_eq!(body["sms_provider"], "Capture");
}

#[actix_web::test]
async fn test_unknown_route() {
    let state = state_with(Arc::new(CapturingDispatcher::default()), Environment::Development);
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/unknown").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Route not found");
}
