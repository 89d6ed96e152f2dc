//! Axum router configuration with middleware.
//!
//! Protocol endpoints sit at the root (`/chat`, `/command`, `/health`);
//! inspection endpoints live under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::http::Uri;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::error::AppError;
use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/bots", get(handlers::session::list_bots))
        .route(
            "/bots/{bot_id}/sessions/{session_id}/messages",
            get(handlers::session::get_messages),
        )
        .route("/bots/{bot_id}/memory", get(handlers::session::get_memory))
        .route(
            "/bots/{bot_id}/sessions/{session_id}/config",
            get(handlers::session::get_config),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(handlers::chat::post_chat))
        .route("/command", post(handlers::chat::post_command))
        .nest("/api/v1", api_routes)
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
