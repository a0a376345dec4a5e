//! HTTP surface
//!
//! Thin request router mapping endpoints to store operations and to the
//! orchestration routine. JSON in, JSON out, permissive CORS for the demo
//! UI.

pub mod api;
pub mod state;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;
use state::AppState;

/// Start the HTTP server.
pub async fn serve(config: ServerConfig, state: AppState) -> Result<()> {
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(api::health_check))
        .route("/workflow/{requirement_id}", get(api::get_workflow))
        .route("/events", get(api::list_events))
        .route("/intake", post(api::intake))
        .route("/approval", post(api::record_approval))
        .route("/state", post(api::update_state))
        .route("/task/update", post(api::update_task))
        .route("/test/fail", post(api::test_fail))
        .route("/agent/run", post(api::run_agents));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}
