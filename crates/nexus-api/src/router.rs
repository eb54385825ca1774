//! Router configuration and server setup.

use std::future::Future;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::handlers;
use crate::state::AppState;

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Creates the API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new().layer(cors_layer(&state.config));

    Router::new()
        // Health
        .route("/api/health", get(handlers::health))
        // Question answering
        .route("/ask", post(handlers::ask))
        .route("/college-ask", post(handlers::college_ask))
        .route("/api/chat", post(handlers::chat))
        // Reminders
        .route("/set-reminder", post(handlers::set_reminder))
        .route("/api/reminders", get(handlers::list_reminders))
        .route("/api/reminders/:id", get(handlers::get_reminder))
        .route("/api/reminders/:id", delete(handlers::cancel_reminder))
        // Telegram
        .route("/api/telegram/send", post(handlers::telegram_send))
        .route("/api/telegram/messages", get(handlers::list_messages))
        .route("/api/telegram/messages", delete(handlers::clear_messages))
        .route("/api/telegram/messages/sync", post(handlers::sync_messages))
        .route("/api/telegram/messages/:id", delete(handlers::delete_message))
        // History
        .route("/api/history", get(handlers::list_history))
        .route("/api/history", post(handlers::add_history))
        .route("/api/history", delete(handlers::clear_history))
        .route("/api/history/:id", delete(handlers::delete_history))
        // Voice
        .route("/api/voice", post(handlers::voice_command))
        // Apply middleware
        .layer(middleware)
        .with_state(state)
}

/// Starts the API server, stopping when `shutdown` resolves.
pub async fn serve(
    config: ApiConfig,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_test_state, CannedGenerator};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use nexus_assistant::{CollegeAdvisor, HospitalKnowledge};
    use nexus_models::{QaPair, Sender, TelegramMessage};
    use serde_json::{json, Value};

    fn server(state: AppState) -> TestServer {
        TestServer::new(create_router(state)).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = server(make_test_state());

        let response = server.get("/api/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert!(!body["version"].as_str().unwrap().is_empty());
        assert_eq!(body["pending_reminders"], 0);
        assert_eq!(body["telegram_enabled"], false);
    }

    #[tokio::test]
    async fn test_ask_endpoint() {
        let state = make_test_state().with_hospital(HospitalKnowledge::new(vec![QaPair::new(
            "Where is the pharmacy located?",
            "Ground floor",
        )]));
        let server = server(state);

        let response = server
            .post("/ask")
            .json(&json!({"question": "Where is the pharmacy located?"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["answer"], "Ground floor");

        let response = server
            .post("/ask")
            .json(&json!({"question": "can I park here"}))
            .await;
        let body: Value = response.json();
        assert_eq!(
            body["answer"],
            "Sorry, I don't have an answer for that question."
        );
    }

    #[tokio::test]
    async fn test_ask_without_question() {
        let server = server(make_test_state());

        let response = server.post("/ask").json(&json!({})).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "No question provided");
    }

    #[tokio::test]
    async fn test_college_ask_endpoint() {
        let generator = CannedGenerator::new(Some("Fees are 1000"));
        let state = make_test_state()
            .with_college(CollegeAdvisor::new(generator.clone(), "Tuition: 1000"));
        let server = server(state);

        let response = server
            .post("/college-ask")
            .json(&json!({"query": "what are the fees?"}))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["answer"], "Fees are 1000");
        assert!(generator.prompts.lock().unwrap()[0].ends_with("User asked: what are the fees?"));
    }

    #[tokio::test]
    async fn test_college_ask_failure() {
        let state =
            make_test_state().with_college(CollegeAdvisor::new(CannedGenerator::failing(), ""));
        let server = server(state);

        let response = server
            .post("/college-ask")
            .json(&json!({"query": "fees?"}))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = response.json();
        assert_eq!(body["error"], "Failed to get answer from Gemini");
    }

    #[tokio::test]
    async fn test_set_reminder_missing_fields() {
        let server = server(make_test_state());

        let response = server
            .post("/set-reminder")
            .json(&json!({"phone": "+919876543210", "date": "2099-01-01"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Missing fields");
    }

    #[tokio::test]
    async fn test_set_reminder_requires_country_code() {
        let server = server(make_test_state());

        let response = server
            .post("/set-reminder")
            .json(&json!({
                "phone": "9876543210",
                "date": "2099-01-01",
                "time": "10:00",
                "reason": "call"
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(
            body["message"],
            "Phone number must start with country code e.g., +91"
        );
    }

    #[tokio::test]
    async fn test_set_reminder_then_list_and_cancel() {
        let server = server(make_test_state());

        let response = server
            .post("/set-reminder")
            .json(&json!({
                "phone": "+919876543210",
                "date": "2099-01-01",
                "time": "10:00",
                "reason": "call the doctor",
                "user_id": "alice"
            }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Reminder set");
        let id = body["id"].as_str().unwrap().to_string();

        let response = server.get("/api/reminders?status=pending").await;
        let body: Value = response.json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["reminders"][0]["time"], "10:00");
        assert_eq!(body["reminders"][0]["channel"], "whatsapp");

        let response = server.get(&format!("/api/reminders/{}", id)).await;
        response.assert_status_ok();

        let response = server.delete(&format!("/api/reminders/{}", id)).await;
        response.assert_status_ok();

        let response = server.get(&format!("/api/reminders/{}", id)).await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server.get("/api/history?user_id=alice&filter=reminders").await;
        let body: Value = response.json();
        assert_eq!(body["total"], 2);
        assert_eq!(body["counts"]["reminders"], 2);
    }

    #[tokio::test]
    async fn test_set_telegram_reminder() {
        let server = server(make_test_state());

        let response = server
            .post("/set-reminder")
            .json(&json!({
                "chat_id": "123456",
                "date": "2099-01-01",
                "time": "7:15 am",
                "reason": "standup"
            }))
            .await;
        response.assert_status_ok();

        let body: Value = server.get("/api/reminders").await.json();
        assert_eq!(body["reminders"][0]["channel"], "telegram");
        assert_eq!(body["reminders"][0]["recipient"], "123456");
        assert_eq!(body["reminders"][0]["time"], "07:15");
    }

    #[tokio::test]
    async fn test_list_reminders_bad_status() {
        let server = server(make_test_state());
        let response = server.get("/api/reminders?status=snoozed").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_telegram_send_disabled() {
        let server = server(make_test_state());

        let response = server
            .post("/api/telegram/send")
            .json(&json!({"name": "Arun", "msg": "hi", "user_id": "alice"}))
            .await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_telegram_messages_lifecycle() {
        let state = make_test_state();
        let server = server(state.clone());

        let messages = vec![
            TelegramMessage::new(Sender::User, "Arun", "hi", "alice").with_id(1),
            TelegramMessage::new(Sender::Bot, "Telegram Bot", "Message sent successfully!", "alice")
                .with_id(2),
        ];
        let response = server
            .post("/api/telegram/messages/sync")
            .json(&json!({"user_id": "alice", "messages": messages}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["count"], 2);

        let body: Value = server.get("/api/telegram/messages?user_id=alice").await.json();
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[1]["sender"], "bot");

        server
            .delete("/api/telegram/messages/1?user_id=bob")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete("/api/telegram/messages/1?user_id=alice")
            .await
            .assert_status_ok();
        server
            .delete("/api/telegram/messages/1?user_id=alice")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let response = server
            .delete("/api/telegram/messages")
            .json(&json!({"user_id": "alice"}))
            .await;
        let body: Value = response.json();
        assert_eq!(body["count"], 1);
        assert!(state.messages.list("alice").await.is_empty());
    }

    #[tokio::test]
    async fn test_history_endpoints() {
        let server = server(make_test_state());

        let response = server
            .post("/api/history")
            .json(&json!({"user_id": "alice", "action": "Sent Telegram message: \"hi\""}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["category"], "telegram");
        let id = body["id"].as_str().unwrap().to_string();

        server
            .post("/api/history")
            .json(&json!({"user_id": "alice", "action": "Asked AI: \"weather\""}))
            .await
            .assert_status(StatusCode::CREATED);

        let body: Value = server
            .get("/api/history?user_id=alice&search=weather")
            .await
            .json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["entries"][0]["category"], "chatbot");

        server
            .delete(&format!("/api/history/{}", id))
            .await
            .assert_status_ok();

        let response = server
            .delete("/api/history")
            .json(&json!({"user_id": "alice"}))
            .await;
        let body: Value = response.json();
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn test_voice_endpoint() {
        let server = server(make_test_state());

        let body: Value = server
            .post("/api/voice")
            .json(&json!({"user_id": "alice", "transcript": "Nexus"}))
            .await
            .json();
        assert_eq!(body["outcome"], "wake");
        assert_eq!(body["reply"], "Yes, boss");

        let body: Value = server
            .post("/api/voice")
            .json(&json!({"user_id": "bob", "transcript": "switch to college"}))
            .await
            .json();
        assert_eq!(body["outcome"], "command");
        assert_eq!(body["view"], "college");
        assert_eq!(body["path"], "/college");
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let server = server(make_test_state());
        let response = server.get("/api/health").await;

        // CORS headers should be present
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = server(make_test_state());

        let response = server.get("/api/reminders/rem-missing").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }
}
