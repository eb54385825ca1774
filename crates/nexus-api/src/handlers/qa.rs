//! Question answering handlers.

use axum::{extract::State, Json};
use tracing::{debug, error};

use crate::error::{ApiError, Result};
use crate::history::{quote_action, QUOTE_LIMIT};
use crate::state::AppState;
use crate::types::{present, AnswerResponse, AskRequest, ChatRequest, CollegeAskRequest};

const NO_QUESTION: &str = "No question provided";
const GEMINI_FAILED: &str = "Failed to get answer from Gemini";
const GEMINI_DISABLED: &str = "Gemini is not configured";

/// POST /ask - Answer a hospital question from the FAQ.
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AnswerResponse>> {
    let question = present(&req.question)
        .ok_or_else(|| ApiError::BadRequest(NO_QUESTION.to_string()))?;

    let answer = state.hospital.find_answer(question).to_string();
    debug!(question, "answered hospital question");

    state
        .note(
            req.user_id.as_deref(),
            quote_action("Asked hospital question", question, QUOTE_LIMIT),
        )
        .await;

    Ok(Json(AnswerResponse { answer }))
}

/// POST /college-ask - Answer from the college document via Gemini.
pub async fn college_ask(
    State(state): State<AppState>,
    Json(req): Json<CollegeAskRequest>,
) -> Result<Json<AnswerResponse>> {
    let query =
        present(&req.query).ok_or_else(|| ApiError::BadRequest(NO_QUESTION.to_string()))?;
    let college = state
        .college
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable(GEMINI_DISABLED.to_string()))?;

    let answer = college.ask(query).await.map_err(|e| {
        error!(error = %e, "Gemini API error");
        ApiError::Internal(GEMINI_FAILED.to_string())
    })?;

    state
        .note(
            req.user_id.as_deref(),
            quote_action("Asked college question", query, QUOTE_LIMIT),
        )
        .await;

    Ok(Json(AnswerResponse { answer }))
}

/// POST /api/chat - General assistant chat via Gemini.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<AnswerResponse>> {
    let text = present(&req.text)
        .ok_or_else(|| ApiError::BadRequest("No text provided".to_string()))?;
    let chat = state
        .chat
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable(GEMINI_DISABLED.to_string()))?;

    let answer = chat.reply(text).await.map_err(|e| {
        error!(error = %e, "Gemini API error");
        ApiError::Internal(GEMINI_FAILED.to_string())
    })?;

    state
        .note(req.user_id.as_deref(), quote_action("Asked AI", text, QUOTE_LIMIT))
        .await;

    Ok(Json(AnswerResponse { answer }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_test_state, CannedGenerator};
    use nexus_assistant::{ChatService, CollegeAdvisor, HospitalKnowledge};
    use nexus_models::{HistoryFilter, QaPair};

    #[tokio::test]
    async fn test_ask_uses_hospital_knowledge() {
        let state = make_test_state().with_hospital(HospitalKnowledge::new(vec![QaPair::new(
            "What are the visiting hours?",
            "10 to 8",
        )]));

        let response = ask(
            State(state.clone()),
            Json(AskRequest {
                question: Some("what are the visiting hours?".into()),
                user_id: Some("alice".into()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.answer, "10 to 8");
        let history = state.history.list("alice", HistoryFilter::Chatbot, None).await;
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_ask_requires_question() {
        let err = ask(State(make_test_state()), Json(AskRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err.message(), NO_QUESTION);
    }

    #[tokio::test]
    async fn test_college_ask_failure_is_internal() {
        let state = make_test_state()
            .with_college(CollegeAdvisor::new(CannedGenerator::failing(), "doc"));

        let err = college_ask(
            State(state),
            Json(CollegeAskRequest {
                query: Some("fees?".into()),
                user_id: None,
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.message(), GEMINI_FAILED);
    }

    #[tokio::test]
    async fn test_chat_without_gemini_is_unavailable() {
        let err = chat(
            State(make_test_state()),
            Json(ChatRequest {
                text: Some("hi".into()),
                user_id: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_chat_replies() {
        let state = make_test_state().with_chat(ChatService::new(CannedGenerator::new(Some("hello!"))));
        let response = chat(
            State(state),
            Json(ChatRequest {
                text: Some("hi".into()),
                user_id: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.answer, "hello!");
    }
}
