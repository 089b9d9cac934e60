use crate::infra::metrics::record_outcome;
use crate::transport::http::types::{status_text, ApiError, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (DB reachable)", body = String),
        (status = 503, description = "Service is unhealthy (DB unreachable)", body = String)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    state
        .service
        .health()
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;
    record_outcome("healthy");
    Ok(status_text(StatusCode::OK))
}
