//! Read-only inspection handlers.
//!
//! Endpoints:
//! - GET /api/v1/bots                                         - Registered bot ids
//! - GET /api/v1/bots/{bot_id}/sessions/{session_id}/messages - Session message log
//! - GET /api/v1/bots/{bot_id}/memory                         - Bot memory map
//! - GET /api/v1/bots/{bot_id}/sessions/{session_id}/config   - Session config map

use std::collections::BTreeMap;
use std::time::Instant;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::Value;

use chathub_types::store::StoredMessage;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for message listing.
#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    /// Keep only the most recent `limit` messages.
    pub limit: Option<u32>,
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// GET /api/v1/bots - List registered bot ids in registration order.
pub async fn list_bots(State(state): State<AppState>) -> Json<ApiResponse<Vec<String>>> {
    let start = Instant::now();
    let request_id = chathub_types::new_request_id();

    let bots = state.hub.registry().bot_ids();

    Json(ApiResponse::success(bots, request_id, elapsed_ms(start)).with_link("self", "/api/v1/bots"))
}

/// GET /api/v1/bots/{bot_id}/sessions/{session_id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    Path((bot_id, session_id)): Path<(String, String)>,
    query: Result<Query<MessageListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<StoredMessage>>>, AppError> {
    let start = Instant::now();
    let request_id = chathub_types::new_request_id();
    let Query(query) = query?;

    let messages = state
        .hub
        .session(bot_id.as_str(), session_id.as_str())
        .messages()
        .list(query.limit)
        .await?;

    let resp = ApiResponse::success(messages, request_id, elapsed_ms(start)).with_link(
        "self",
        &format!("/api/v1/bots/{bot_id}/sessions/{session_id}/messages"),
    );
    Ok(Json(resp))
}

/// GET /api/v1/bots/{bot_id}/memory
pub async fn get_memory(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
) -> Result<Json<ApiResponse<BTreeMap<String, Value>>>, AppError> {
    let start = Instant::now();
    let request_id = chathub_types::new_request_id();

    // Memory is bot-wide; the session id is irrelevant here.
    let memory = state.hub.session(bot_id.as_str(), "").memory().list_all().await?;

    let resp = ApiResponse::success(memory, request_id, elapsed_ms(start))
        .with_link("self", &format!("/api/v1/bots/{bot_id}/memory"));
    Ok(Json(resp))
}

/// GET /api/v1/bots/{bot_id}/sessions/{session_id}/config
pub async fn get_config(
    State(state): State<AppState>,
    Path((bot_id, session_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<BTreeMap<String, Value>>>, AppError> {
    let start = Instant::now();
    let request_id = chathub_types::new_request_id();

    let config = state
        .hub
        .session(bot_id.as_str(), session_id.as_str())
        .config()
        .list_all()
        .await?;

    let resp = ApiResponse::success(config, request_id, elapsed_ms(start)).with_link(
        "self",
        &format!("/api/v1/bots/{bot_id}/sessions/{session_id}/config"),
    );
    Ok(Json(resp))
}
