//! Health check handler.

use axum::{extract::State, Json};

use crate::state::AppState;
use crate::types::HealthResponse;

/// GET /api/health - Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.config.uptime_seconds(),
        pending_reminders: state.reminders.pending_count().await,
        channels: state
            .notifiers
            .channels()
            .iter()
            .map(|c| c.as_str().to_string())
            .collect(),
        telegram_enabled: state.relay.is_some(),
        gemini_enabled: state.chat.is_some(),
    })
}
