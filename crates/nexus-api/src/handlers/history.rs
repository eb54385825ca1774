//! Activity history handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use nexus_models::{HistoryFilter, HistoryId};

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::{
    present, AddHistoryRequest, CountResponse, HistoryItem, HistoryListResponse, HistoryQuery,
    SuccessResponse, UserQuery,
};

fn required_user(user_id: &Option<String>) -> Result<&str> {
    present(user_id).ok_or_else(|| ApiError::BadRequest("user_id is required".to_string()))
}

/// GET /api/history - A user's history, newest first.
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryListResponse>> {
    let user_id = required_user(&query.user_id)?;
    let filter = query
        .filter
        .as_deref()
        .unwrap_or_default()
        .parse::<HistoryFilter>()
        .map_err(ApiError::BadRequest)?;

    let entries = state
        .history
        .list(user_id, filter, query.search.as_deref())
        .await;

    Ok(Json(HistoryListResponse::from_entries(&entries)))
}

/// POST /api/history - Record an action.
pub async fn add_history(
    State(state): State<AppState>,
    Json(req): Json<AddHistoryRequest>,
) -> Result<(StatusCode, Json<HistoryItem>)> {
    let user_id = required_user(&req.user_id)?;
    let action = present(&req.action)
        .ok_or_else(|| ApiError::BadRequest("action is required".to_string()))?;

    let entry = state.history.record(user_id, action).await?;
    Ok((StatusCode::CREATED, Json(HistoryItem::from(&entry))))
}

/// DELETE /api/history - Clear a user's history.
pub async fn clear_history(
    State(state): State<AppState>,
    Json(req): Json<UserQuery>,
) -> Result<Json<CountResponse>> {
    let user_id = required_user(&req.user_id)?;
    let count = state.history.clear(user_id).await?;

    Ok(Json(CountResponse {
        success: true,
        message: "History cleared".to_string(),
        count,
    }))
}

/// DELETE /api/history/:id - Delete one entry.
pub async fn delete_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    if !state.history.delete(&HistoryId::from(id.as_str())).await? {
        return Err(ApiError::NotFound(format!("history entry not found: {}", id)));
    }
    Ok(Json(SuccessResponse::new("History entry deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::make_test_state;

    #[tokio::test]
    async fn test_list_requires_user() {
        let err = list_history(State(make_test_state()), Query(HistoryQuery::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_filter() {
        let err = list_history(
            State(make_test_state()),
            Query(HistoryQuery {
                user_id: Some("alice".into()),
                filter: Some("weather".into()),
                search: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_add_then_delete() {
        let state = make_test_state();
        let (status, item) = add_history(
            State(state.clone()),
            Json(AddHistoryRequest {
                user_id: Some("alice".into()),
                action: Some("Set alarm for 7".into()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(item.icon, "⏰");

        delete_history(State(state.clone()), Path(item.id.clone()))
            .await
            .unwrap();
        assert!(delete_history(State(state), Path(item.id.clone()))
            .await
            .is_err());
    }
}
