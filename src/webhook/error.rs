use lambda_http::http::StatusCode;
use lambda_http::{Body, Response};
use thiserror::Error;

use hot_water::shared::error::{error_codes, ErrorResponse};
use hot_water::{MetricsError, ValidationErrorKind};

/// Main error type for the telemetry webhook
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Validation-specific errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {0}")]
    MissingField(String),

    #[error("Invalid value for field {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl From<hot_water::ValidationError> for ValidationError {
    fn from(err: hot_water::ValidationError) -> Self {
        match err.kind {
            ValidationErrorKind::Missing => ValidationError::MissingField(err.field),
            ValidationErrorKind::InvalidValue => ValidationError::InvalidValue {
                field: err.field,
                message: err.message,
            },
        }
    }
}

impl From<hot_water::ValidationError> for ApiError {
    fn from(err: hot_water::ValidationError) -> Self {
        ApiError::Validation(err.into())
    }
}

impl ApiError {
    /// Convert error to HTTP response with appropriate status code and error payload
    pub fn to_http_response(&self, request_id: &str) -> Response<Body> {
        let (status, error_code, message): (u16, &str, String) = match self {
            ApiError::Validation(ValidationError::MissingField(field)) => (
                400,
                error_codes::MISSING_FIELD,
                format!("Required field missing: {}", field),
            ),
            ApiError::Validation(ValidationError::InvalidValue { message, .. }) => {
                (400, error_codes::INVALID_VALUE, message.clone())
            }
            ApiError::Validation(ValidationError::InvalidBody(detail)) => (
                400,
                error_codes::INVALID_FORMAT,
                format!("Invalid request body: {}", detail),
            ),
            ApiError::Metrics(e) => (500, error_codes::METRICS_ERROR, e.to_string()),
            ApiError::Internal(detail) => (500, error_codes::INTERNAL_ERROR, detail.clone()),
        };

        let error_response = ErrorResponse::new(error_code, &message, request_id);

        let body = error_response.to_json().unwrap_or_else(|_| {
            String::from(
                r#"{"success":false,"error":"INTERNAL_ERROR","message":"Failed to serialize error response","request_id":""}"#,
            )
        });

        Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap_or_else(|_| {
                let mut fallback = Response::new(Body::from(String::from(
                    r#"{"success":false,"error":"INTERNAL_ERROR","message":"Failed to build response"}"#,
                )));
                *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}
