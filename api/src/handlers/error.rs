//! Mapping from domain and request errors to HTTP responses

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use std::fmt;
use validator::ValidationErrors;

use hm_core::errors::DomainError;

use crate::dto::{ErrorResponse, FieldError, ValidationFailedResponse};

/// Error returned by the OTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// Request rejected before reaching the service (400)
    Validation(Vec<FieldError>),

    /// Service failure (500)
    Internal {
        message: String,
        /// Underlying error text, included in the body in development
        detail: Option<String>,
    },
}

impl ApiError {
    /// Map a service error. Validation errors keep their field; everything
    /// else becomes a 500 with the error text as the message, or `fallback`
    /// when the text is empty.
    pub fn from_domain(error: DomainError, fallback: &str, expose_detail: bool) -> Self {
        match error {
            DomainError::Validation { field, message } => {
                ApiError::Validation(vec![FieldError::body(field, message)])
            }
            other => {
                let text = other.to_string();
                log::error!("OTP request failed: {}", text);
                let message = if text.is_empty() {
                    fallback.to_string()
                } else {
                    text.clone()
                };
                ApiError::Internal {
                    message,
                    detail: expose_detail.then_some(text),
                }
            }
        }
    }

    pub fn from_validation(errors: &ValidationErrors) -> Self {
        ApiError::Validation(field_errors(errors))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => {
                write!(f, "{} ({} field errors)", ValidationFailedResponse::MESSAGE, errors.len())
            }
            ApiError::Internal { message, .. } => write!(f, "{}", message),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(errors) => HttpResponse::BadRequest()
                .json(ValidationFailedResponse::new(errors.clone())),
            ApiError::Internal { message, detail } => {
                HttpResponse::InternalServerError().json(ErrorResponse {
                    message: message.clone(),
                    error: detail.clone(),
                })
            }
        }
    }
}

/// Flatten `validator` output into one entry per failed rule, ordered by field
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<(String, Vec<String>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, failures)| {
            let messages = failures
                .iter()
                .map(|failure| {
                    failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", failure.code))
                })
                .collect();
            (camel_case(&field.to_string()), messages)
        })
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(path, messages)| {
            messages
                .into_iter()
                .map(move |msg| FieldError::body(path.clone(), msg))
        })
        .collect()
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Malformed or non-JSON bodies get the validation response shape
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected request body: {}", err);
    ApiError::Validation(vec![FieldError::body("body", "Request body must be valid JSON")]).into()
}
