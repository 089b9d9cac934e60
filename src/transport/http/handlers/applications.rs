use crate::domain::application::{
    ApplicationRecord, LookupRequest, RegistrationRequest, UpdateRequest,
};
use crate::infra::metrics::record_outcome;
use crate::transport::http::types::{status_text, ApiError, AppState};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

fn query<T>(extracted: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    extracted
        .map(|Query(params)| params)
        .map_err(|e| ApiError::malformed_query(e.body_text()))
}

#[utoipa::path(
    post,
    path = "/register",
    params(RegistrationRequest),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Registered; body is the new app id", body = String),
        (status = 400, description = "Invalid fields or storage conflict", body = String),
        (status = 401, description = "Missing or wrong API key", body = String)
    )
)]
pub async fn register_handler(
    State(state): State<AppState>,
    params: Result<Query<RegistrationRequest>, QueryRejection>,
) -> Result<String, ApiError> {
    let new_app = query(params)?.validate()?;
    let app_id = state.service.register(new_app).await?;
    record_outcome("registered");
    Ok(app_id.to_string())
}

#[utoipa::path(
    patch,
    path = "/update",
    params(UpdateRequest),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Updated; body is the app id", body = String),
        (status = 400, description = "Invalid fields, unknown app or ownership mismatch", body = String),
        (status = 401, description = "Missing or wrong API key", body = String)
    )
)]
pub async fn update_handler(
    State(state): State<AppState>,
    params: Result<Query<UpdateRequest>, QueryRejection>,
) -> Result<String, ApiError> {
    let update = query(params)?.validate()?;
    let app_id = state.service.update(update).await?;
    record_outcome("updated");
    Ok(app_id.to_string())
}

#[utoipa::path(
    get,
    path = "/get_app",
    params(LookupRequest),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "The stored application", body = ApplicationRecord),
        (status = 400, description = "Invalid fields, unknown app or ownership mismatch", body = String),
        (status = 401, description = "Missing or wrong API key", body = String)
    )
)]
pub async fn get_app_handler(
    State(state): State<AppState>,
    params: Result<Query<LookupRequest>, QueryRejection>,
) -> Result<Json<ApplicationRecord>, ApiError> {
    let lookup = query(params)?.validate()?;
    let record = state.service.get(lookup).await?;
    record_outcome("fetched");
    Ok(Json(record))
}

#[utoipa::path(
    delete,
    path = "/remove",
    params(LookupRequest),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Removed", body = String),
        (status = 400, description = "Invalid fields, unknown app or ownership mismatch", body = String),
        (status = 401, description = "Missing or wrong API key", body = String)
    )
)]
pub async fn remove_handler(
    State(state): State<AppState>,
    params: Result<Query<LookupRequest>, QueryRejection>,
) -> Result<Response, ApiError> {
    let lookup = query(params)?.validate()?;
    state.service.remove(lookup).await?;
    record_outcome("removed");
    Ok(status_text(StatusCode::OK))
}
