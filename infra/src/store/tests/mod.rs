//! Unit tests for OTP stores
