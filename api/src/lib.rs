//! HomeMate HTTP API
//!
//! Library exports for the server binary and the HTTP tests.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::{create_app, AppState, StoreStatus};
