use crate::app::registration_service::{RegistrationService, ServiceError};
use crate::domain::application::ValidationError;
use crate::infra::metrics::record_outcome;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{error, warn};

/// Header carrying the shared API key.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct AppState {
    pub service: RegistrationService,
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(service: RegistrationService, api_key: impl Into<Arc<str>>) -> Self {
        Self {
            service,
            api_key: api_key.into(),
        }
    }
}

/// Everything a handler can fail with. Responses carry only the status text so that
/// clients cannot tell a missing record from a failed ownership check.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    BadRequest { outcome: &'static str, detail: String },
    Unavailable(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used for logging and the request outcome counter.
    pub fn outcome(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "auth_failure",
            ApiError::BadRequest { outcome, .. } => *outcome,
            ApiError::Unavailable(_) => "unavailable",
            ApiError::Internal(_) => "storage_failure",
        }
    }

    pub fn malformed_query(detail: impl Into<String>) -> Self {
        ApiError::BadRequest {
            outcome: "validation_failure",
            detail: detail.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest {
            outcome: "validation_failure",
            detail: err.to_string(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let outcome = match &err {
            ServiceError::NotFound => "not_found",
            ServiceError::OwnershipMismatch => "ownership_mismatch",
            ServiceError::Conflict(_) => "storage_conflict",
            ServiceError::Storage(_) => return ApiError::Internal(err.to_string()),
        };
        ApiError::BadRequest {
            outcome,
            detail: err.to_string(),
        }
    }
}

/// Status code plus its canonical reason phrase as a plain-text body.
pub fn status_text(status: StatusCode) -> Response {
    (status, status.canonical_reason().unwrap_or_default()).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let outcome = self.outcome();
        record_outcome(outcome);
        match &self {
            ApiError::Unauthorized => warn!(outcome, "request rejected"),
            ApiError::BadRequest { detail, .. } => {
                warn!(outcome, detail = %detail, "request rejected")
            }
            ApiError::Unavailable(detail) => {
                error!(outcome, detail = %detail, "health check failed")
            }
            ApiError::Internal(detail) => error!(outcome, detail = %detail, "request failed"),
        }
        status_text(status)
    }
}
