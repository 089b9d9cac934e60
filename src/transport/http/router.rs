use crate::domain::application::ApplicationRecord;
use crate::transport::http::auth::require_api_key;
use crate::transport::http::handlers::{applications, health};
use crate::transport::http::types::AppState;
use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        applications::register_handler,
        applications::update_handler,
        applications::get_app_handler,
        applications::remove_handler
    ),
    components(schemas(ApplicationRecord)),
    modifiers(&ApiKeyAddon)
)]
pub struct ApiDoc;

struct ApiKeyAddon;

impl Modify for ApiKeyAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

/// Builds the API: `/health` is open, everything else sits behind the API key guard.
pub fn create_router(app_state: AppState) -> Router {
    let protected = Router::new()
        .route("/register", post(applications::register_handler))
        .route("/update", patch(applications::update_handler))
        .route("/get_app", get(applications::get_app_handler))
        .route("/remove", delete(applications::remove_handler))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .merge(protected)
        .with_state(app_state)
}
