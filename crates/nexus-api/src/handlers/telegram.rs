//! Telegram relay and conversation handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use nexus_models::TelegramMessage;
use nexus_telegram::ANONYMOUS_USER;

use crate::error::{ApiError, Result};
use crate::history::{quote_action, QUOTE_LIMIT};
use crate::state::AppState;
use crate::types::{
    present, CountResponse, SuccessResponse, TelegramSendData, TelegramSendRequest,
    TelegramSendResponse, TelegramSyncRequest, UserQuery,
};

fn user_or_anonymous(user_id: &Option<String>) -> &str {
    present(user_id).unwrap_or(ANONYMOUS_USER)
}

/// POST /api/telegram/send - Relay a message to the Telegram chat.
pub async fn telegram_send(
    State(state): State<AppState>,
    Json(req): Json<TelegramSendRequest>,
) -> Result<Json<TelegramSendResponse>> {
    let (Some(name), Some(msg)) = (present(&req.name), present(&req.msg)) else {
        return Err(ApiError::BadRequest(
            "Name and message are required".to_string(),
        ));
    };
    let relay = state
        .relay
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("Telegram relay is not configured".to_string()))?;

    let user_id = user_or_anonymous(&req.user_id);
    let ack = relay.send(name, msg, user_id).await?;

    state
        .note(
            present(&req.user_id),
            quote_action("Sent Telegram message", msg, QUOTE_LIMIT),
        )
        .await;

    Ok(Json(TelegramSendResponse {
        success: true,
        data: TelegramSendData { msg: ack.msg },
    }))
}

/// GET /api/telegram/messages - A user's conversation, oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Json<Vec<TelegramMessage>> {
    Json(state.messages.list(user_or_anonymous(&query.user_id)).await)
}

/// POST /api/telegram/messages/sync - Replace a user's conversation.
pub async fn sync_messages(
    State(state): State<AppState>,
    Json(req): Json<TelegramSyncRequest>,
) -> Result<Json<CountResponse>> {
    let user_id = user_or_anonymous(&req.user_id);
    let count = state.messages.sync(user_id, req.messages).await?;

    Ok(Json(CountResponse {
        success: true,
        message: format!("Synced {} messages", count),
        count,
    }))
}

/// DELETE /api/telegram/messages - Clear a user's conversation.
pub async fn clear_messages(
    State(state): State<AppState>,
    Json(req): Json<UserQuery>,
) -> Result<Json<CountResponse>> {
    let user_id = present(&req.user_id)
        .ok_or_else(|| ApiError::BadRequest("user_id is required".to_string()))?;
    let count = state.messages.clear(user_id).await?;
    info!(user_id, count, "cleared Telegram messages");

    if count > 0 {
        state
            .note(
                Some(user_id),
                format!("Cleared Telegram chat with {} messages", count),
            )
            .await;
    }

    Ok(Json(CountResponse {
        success: true,
        message: "Messages cleared".to_string(),
        count,
    }))
}

/// DELETE /api/telegram/messages/:id - Delete one of a user's messages.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<UserQuery>,
) -> Result<Json<SuccessResponse>> {
    let user_id = user_or_anonymous(&query.user_id);
    if !state.messages.delete(user_id, id).await? {
        return Err(ApiError::NotFound(format!("message not found: {}", id)));
    }
    Ok(Json(SuccessResponse::new("Message deleted")))
}
