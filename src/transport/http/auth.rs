//! Shared-secret API key guard for the protected routes.

use crate::transport::http::types::{ApiError, AppState, API_KEY_HEADER};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;
use tracing::debug;

/// Rejects the request with 401 unless `X-API-Key` equals the configured key.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let supplied = request
        .headers()
        .get(API_KEY_HEADER)
        .ok_or(ApiError::Unauthorized)?
        .as_bytes();

    if !keys_match(supplied, state.api_key.as_bytes()) {
        return Err(ApiError::Unauthorized);
    }

    debug!(path = %request.uri().path(), "api key accepted");
    Ok(next.run(request).await)
}

fn keys_match(supplied: &[u8], expected: &[u8]) -> bool {
    supplied.ct_eq(expected).into()
}
