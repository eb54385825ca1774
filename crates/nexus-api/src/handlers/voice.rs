//! Voice command handler.

use std::time::Instant;

use axum::{extract::State, Json};
use tracing::debug;

use nexus_assistant::VoiceOutcome;
use nexus_telegram::ANONYMOUS_USER;

use crate::error::{ApiError, Result};
use crate::history::{quote_action, QUOTE_LIMIT};
use crate::state::AppState;
use crate::types::{present, VoiceRequest, VoiceResponse};

/// POST /api/voice - Run a transcript through the user's voice gate.
pub async fn voice_command(
    State(state): State<AppState>,
    Json(req): Json<VoiceRequest>,
) -> Result<Json<VoiceResponse>> {
    let transcript = present(&req.transcript)
        .ok_or_else(|| ApiError::BadRequest("No transcript provided".to_string()))?;
    let user_id = present(&req.user_id).unwrap_or(ANONYMOUS_USER);

    let outcome = {
        let now = Instant::now();
        let mut gates = state.voice_gates.lock().await;
        let outcome = gates
            .entry(user_id.to_string())
            .or_default()
            .process(transcript, now);
        gates.retain(|_, gate| !gate.is_idle(now));
        outcome
    };
    debug!(user_id, ?outcome, "voice transcript processed");

    let path = match &outcome {
        VoiceOutcome::Command { command, view } => {
            state
                .note(
                    present(&req.user_id),
                    quote_action("Voice command", command, QUOTE_LIMIT),
                )
                .await;
            view.map(|v| v.path().to_string())
        }
        _ => None,
    };

    Ok(Json(VoiceResponse { outcome, path }))
}
