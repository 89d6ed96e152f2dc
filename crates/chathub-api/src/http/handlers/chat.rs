//! Protocol endpoints.
//!
//! - POST /chat    - `ChatPayload` in, `ChatEvent` out
//! - POST /command - `CommandPayload` in, `CommandResult` out
//!
//! Bodies that fail to decode (bad JSON, unknown segment type or role,
//! missing fields) are rejected with 400 before reaching the hub. Anything
//! that decodes gets a protocol answer, including unknown bots and unknown
//! commands.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use chathub_types::chat::{ChatEvent, ChatPayload};
use chathub_types::command::{CommandPayload, CommandResult};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /chat - Dispatch a chat payload to its bot.
pub async fn post_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatPayload>, JsonRejection>,
) -> Result<Json<ChatEvent>, AppError> {
    let Json(payload) = payload?;
    tracing::debug!(
        bot_id = %payload.bot_id,
        session_id = %payload.session_id,
        request_id = %payload.request_id,
        "chat request"
    );

    Ok(Json(state.hub.chat(payload).await))
}

/// POST /command - Execute a session command.
pub async fn post_command(
    State(state): State<AppState>,
    payload: Result<Json<CommandPayload>, JsonRejection>,
) -> Result<Json<CommandResult>, AppError> {
    let Json(payload) = payload?;
    tracing::debug!(
        bot_id = %payload.bot_id,
        session_id = %payload.session_id,
        command = payload.command.type_name(),
        "command request"
    );

    Ok(Json(state.hub.command(&payload).await))
}
