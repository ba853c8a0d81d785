//! HTTP server and CORS configuration

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Worker threads (0 = actix default, one per core)
    #[serde(default)]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            workers: 0,
        }
    }
}

impl ServerConfig {
    /// Create a server configuration for a host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Create from environment variables (`SERVER_HOST`, `SERVER_PORT` or `PORT`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = super::env_non_empty("SERVER_PORT")
            .or_else(|| super::env_non_empty("PORT"))
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        Self {
            host: super::env_non_empty("SERVER_HOST").unwrap_or(defaults.host),
            port,
            workers: super::env_or("SERVER_WORKERS", defaults.workers),
        }
    }

    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Origins allowed in production
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Max age for preflight cache in seconds
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
            max_age: 3600,
        }
    }
}

impl CorsConfig {
    /// Create from `ALLOWED_ORIGINS` (comma-separated), `FRONTEND_URL` and `CORS_MAX_AGE`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut allowed_origins = super::env_non_empty("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or(defaults.allowed_origins);

        if let Some(frontend) = super::env_non_empty("FRONTEND_URL") {
            if !allowed_origins.contains(&frontend) {
                allowed_origins.push(frontend);
            }
        }

        Self {
            allowed_origins,
            max_age: super::env_or("CORS_MAX_AGE", defaults.max_age),
        }
    }
}
