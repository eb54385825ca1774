//! Reminder handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use tracing::{info, warn};

use nexus_assistant::parse_clock;
use nexus_models::{Channel, Reminder, ReminderId, ReminderStatus};
use nexus_notify::{parse_chat_id, validate_phone};

use crate::error::{ApiError, Result};
use crate::history::{quote_action, QUOTE_LIMIT};
use crate::state::AppState;
use crate::types::{
    present, ReminderListQuery, ReminderListResponse, SetReminderRequest, SetReminderResponse,
    SuccessResponse,
};

/// Reply for requests lacking a recipient, date, time or reason.
pub const MISSING_FIELDS: &str = "Missing fields";

/// POST /set-reminder - Schedule a reminder.
pub async fn set_reminder(
    State(state): State<AppState>,
    Json(req): Json<SetReminderRequest>,
) -> Result<Json<SetReminderResponse>> {
    let channel = resolve_channel(&req)?;
    let recipient = match channel {
        Channel::Whatsapp => present(&req.phone),
        Channel::Telegram => present(&req.chat_id),
    };

    let (Some(recipient), Some(date), Some(time), Some(reason)) = (
        recipient,
        present(&req.date),
        present(&req.time),
        present(&req.reason),
    ) else {
        return Err(ApiError::BadRequest(MISSING_FIELDS.to_string()));
    };

    let recipient = match channel {
        Channel::Whatsapp => validate_phone(recipient)?,
        Channel::Telegram => parse_chat_id(recipient)?.to_string(),
    };

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest("Invalid date, expected YYYY-MM-DD".to_string()))?;
    let time = parse_clock(time)
        .ok_or_else(|| ApiError::BadRequest("Invalid time, expected HH:MM".to_string()))?;

    let scheduled = date.and_time(time);
    if scheduled < current_minute(Local::now().naive_local()) {
        return Err(ApiError::BadRequest(
            "Reminder time is in the past".to_string(),
        ));
    }

    if !state.notifiers.supports(channel) {
        warn!(%channel, "no notifier configured; reminder will fail at delivery");
    }

    let mut reminder = Reminder::new(channel, recipient, date, time, reason);
    if let Some(name) = present(&req.name) {
        reminder = reminder.with_name(name);
    }
    if let Some(user_id) = present(&req.user_id) {
        reminder = reminder.with_user(user_id);
    }

    let id = state.reminders.add(reminder).await?;
    info!(id = %id, %channel, at = %scheduled, "reminder set");

    state
        .note(
            req.user_id.as_deref(),
            format!(
                "{} for {}",
                quote_action("Set reminder", reason, QUOTE_LIMIT),
                scheduled.format("%Y-%m-%d %H:%M")
            ),
        )
        .await;

    Ok(Json(SetReminderResponse {
        success: true,
        message: "Reminder set".to_string(),
        id: id.as_str().to_string(),
        scheduled_for: scheduled.format("%Y-%m-%dT%H:%M").to_string(),
    }))
}

/// GET /api/reminders - List reminders with optional filters.
pub async fn list_reminders(
    State(state): State<AppState>,
    Query(query): Query<ReminderListQuery>,
) -> Result<Json<ReminderListResponse>> {
    let status = present(&query.status)
        .map(|s| s.parse::<ReminderStatus>())
        .transpose()
        .map_err(ApiError::BadRequest)?;
    let user_id = present(&query.user_id);

    let reminders: Vec<Reminder> = state
        .reminders
        .list()
        .await
        .into_iter()
        .filter(|r| status.map_or(true, |s| r.status == s))
        .filter(|r| user_id.map_or(true, |u| r.user_id.as_deref() == Some(u)))
        .collect();

    Ok(Json(ReminderListResponse {
        total: reminders.len(),
        reminders,
    }))
}

/// GET /api/reminders/:id - Get a reminder by ID.
pub async fn get_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Reminder>> {
    let reminder = state
        .reminders
        .get(&ReminderId::from(id.as_str()))
        .await
        .ok_or_else(|| ApiError::NotFound(format!("reminder not found: {}", id)))?;

    Ok(Json(reminder))
}

/// DELETE /api/reminders/:id - Cancel a reminder.
pub async fn cancel_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let reminder_id = ReminderId::from(id.as_str());
    let removed = state.reminders.cancel(&reminder_id).await?;
    info!(id = %reminder_id, "reminder cancelled");

    if !removed.is_finished() {
        state
            .note(
                removed.user_id.as_deref(),
                quote_action("Cancelled reminder", &removed.reason, QUOTE_LIMIT),
            )
            .await;
    }

    Ok(Json(SuccessResponse::new("Reminder cancelled")))
}

fn resolve_channel(req: &SetReminderRequest) -> Result<Channel> {
    if let Some(channel) = present(&req.channel) {
        return channel.parse().map_err(ApiError::BadRequest);
    }
    if present(&req.phone).is_none() && present(&req.chat_id).is_some() {
        return Ok(Channel::Telegram);
    }
    Ok(Channel::Whatsapp)
}

fn current_minute(now: NaiveDateTime) -> NaiveDateTime {
    now.date()
        .and_hms_opt(now.hour(), now.minute(), 0)
        .unwrap_or(now)
}
