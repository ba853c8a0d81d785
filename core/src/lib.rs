//! # HomeMate Core
//!
//! Core business logic for HomeMate phone verification.
//! This crate contains the OTP record entity, the verification service with
//! its store and dispatcher abstractions, and the domain error types.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
