//! Error response bodies

use serde::{Deserialize, Serialize};

/// Generic failure body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    /// Underlying error, only exposed in development
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }
}

/// One rejected request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: String,
    pub msg: String,
    pub path: String,
    pub location: String,
}

impl FieldError {
    pub fn body(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            kind: "field".to_string(),
            msg: msg.into(),
            path: path.into(),
            location: "body".to_string(),
        }
    }
}

/// 400 body for requests that fail validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationFailedResponse {
    pub message: String,
    pub errors: Vec<FieldError>,
}

impl ValidationFailedResponse {
    pub const MESSAGE: &'static str = "Validation failed";

    pub fn new(errors: Vec<FieldError>) -> Self {
        Self {
            message: Self::MESSAGE.to_string(),
            errors,
        }
    }
}
