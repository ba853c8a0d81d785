//! CORS middleware configuration for the web frontend.
//!
//! Development is permissive. Production only allows the configured
//! origins plus Vercel preview deployments, with credentials.

use actix_cors::Cors;
use actix_web::http::{header, header::HeaderValue, Method};

use hm_shared::{CorsConfig, Environment};

/// Creates a CORS middleware instance for the given environment.
pub fn create_cors(environment: Environment, config: &CorsConfig) -> Cors {
    if environment.is_production() {
        create_production_cors(config)
    } else {
        create_development_cors(config.max_age)
    }
}

fn create_development_cors(max_age: usize) -> Cors {
    log::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .max_age(max_age)
        .supports_credentials()
}

fn create_production_cors(config: &CorsConfig) -> Cors {
    log::info!("Configuring CORS for production environment");

    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .allowed_origin_fn(|origin, _req| is_vercel_origin(origin))
        .max_age(config.max_age)
        .supports_credentials();

    for origin in &config.allowed_origins {
        log::info!("Adding allowed origin: {}", origin);
        cors = cors.allowed_origin(origin);
    }

    cors
}

/// Preview and production deployments served from `*.vercel.app`
fn is_vercel_origin(origin: &HeaderValue) -> bool {
    origin
        .to_str()
        .map(|o| o.ends_with(".vercel.app"))
        .unwrap_or(false)
}
