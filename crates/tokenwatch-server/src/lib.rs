pub mod error;
pub mod render;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use tokenwatch_core::config::Config;

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing with an
/// injected authority double.
pub fn build_router(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Operator page + browser form actions
        .route("/", get(routes::inventory::index))
        .route("/renew", post(routes::actions::renew_form))
        .route("/revoke", post(routes::actions::revoke_form))
        // JSON API
        .route("/api/tokens", get(routes::inventory::list_tokens))
        .route("/api/tokens/renew", post(routes::actions::renew_api))
        .route("/api/tokens/revoke", post(routes::actions::revoke_api))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the tokenwatch web UI server.
pub async fn serve(config: Config, port: u16) -> anyhow::Result<()> {
    let app_state = state::AppState::new(config)?;
    let app = build_router(app_state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("tokenwatch UI server listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
