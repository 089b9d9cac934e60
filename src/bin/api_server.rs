// src/bin/api_server.rs

use app_registry::infra::config::redact_url;
use app_registry::infra::logging::init_logging;
use app_registry::transport;
use app_registry::{Config, PostgresApplicationStore, RegistrationService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::from_env()?;
    info!(?config, "configuration loaded");
    info!(
        host = %config.metrics_host,
        port = config.metrics_port,
        "metrics collector endpoint"
    );

    // --- Store Initialization ---
    info!(database = %redact_url(&config.database_url), "connecting to database");
    let store =
        PostgresApplicationStore::connect(&config.database_url, config.max_connections).await?;
    store.ensure_schema().await?;
    info!("applications table ready");

    let service = RegistrationService::new(Arc::new(store));
    let app_state = transport::http::AppState::new(service, config.api_key.as_str());

    // --- API Server Initialization ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "API server listening");
    info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
        })
        .await?;

    info!("graceful shutdown complete");
    Ok(())
}
