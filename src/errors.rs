// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Resource not found with id: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid location: {0}")]
    InvalidLocationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Upstream API error: {0}")]
    UpstreamError(String),
}

/// Convert ResourceError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for ResourceError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = match self {
            ResourceError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ResourceError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ResourceError::InvalidLocationError(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_LOCATION")
            }
            ResourceError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
            }
            ResourceError::UpstreamError(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ResourceError::NotFound(_) => StatusCode::NOT_FOUND,
            ResourceError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ResourceError::InvalidLocationError(_) => StatusCode::BAD_REQUEST,
            ResourceError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ResourceError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
