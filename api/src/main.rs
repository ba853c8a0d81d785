use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use hm_api::{create_app, middleware::create_cors, AppState};
use hm_core::services::{OtpService, OtpServiceConfig, SmsDispatcher};
use hm_infra::{create_otp_store, create_sms_dispatcher};
use hm_shared::config::environment::{LogFormat, LoggingConfig};
use hm_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config.logging);

    log::info!("Starting HomeMate API Server ({})", config.environment);

    let store = Arc::new(create_otp_store(&config.store, config.otp.store_timeout()).await);
    let dispatcher = Arc::new(create_sms_dispatcher(&config.sms).await);
    if !dispatcher.is_configured() {
        log::warn!(
            "SMS provider '{}' is missing credentials, sends will fail",
            dispatcher.provider_name()
        );
    }

    let otp_service = Arc::new(OtpService::new(
        store,
        dispatcher,
        OtpServiceConfig::from(&config.otp),
    ));
    let state = web::Data::new(AppState::new(otp_service, config.environment));

    let bind_address = config.server.bind_address();
    log::info!("Server will bind to: {}", bind_address);

    let environment = config.environment;
    let cors_config = config.cors.clone();
    let mut server = HttpServer::new(move || {
        create_app(state.clone(), create_cors(environment, &cors_config))
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server terminated with an error")?;

    log::info!("Server stopped");
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level;
/// `log` records from actix are forwarded to it.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},actix_web=info", logging.level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
