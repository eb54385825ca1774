//! WhatsApp delivery through the Twilio Messages API.

use std::time::Duration;

use async_trait::async_trait;
use nexus_core::env_var;
use nexus_models::Channel;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{NotifyError, Result};
use crate::traits::{Delivery, Notifier};

/// Environment variable for the Twilio account SID.
pub const TWILIO_SID_ENV: &str = "TWILIO_SID";

/// Environment variable for the Twilio auth token.
pub const TWILIO_AUTH_ENV: &str = "TWILIO_AUTH";

/// Environment variable overriding the WhatsApp sender number.
pub const TWILIO_FROM_ENV: &str = "TWILIO_WHATSAPP_FROM";

/// Twilio's shared WhatsApp sandbox number.
pub const SANDBOX_SENDER: &str = "+14155238886";

const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Default limit for one Messages API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Twilio credentials and endpoint.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Account SID, also the basic-auth user.
    pub account_sid: String,
    /// Auth token, the basic-auth password.
    pub auth_token: String,
    /// Sender phone number in E.164 form.
    pub from: String,
    /// API base URL.
    pub base_url: String,
    /// Limit for one request.
    pub timeout: Duration,
}

impl TwilioConfig {
    /// Creates a config using the sandbox sender.
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from: SANDBOX_SENDER.to_string(),
            base_url: TWILIO_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads `TWILIO_SID`, `TWILIO_AUTH` and optionally `TWILIO_WHATSAPP_FROM`.
    ///
    /// Returns `None` when credentials are absent.
    pub fn from_env() -> Option<Self> {
        let sid = env_var(TWILIO_SID_ENV)?;
        let token = env_var(TWILIO_AUTH_ENV)?;
        let mut config = Self::new(sid, token);
        if let Some(from) = env_var(TWILIO_FROM_ENV) {
            config.from = from;
        }
        Some(config)
    }

    /// Sets the sender number.
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The Messages resource for this account.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.account_sid
        )
    }
}

/// Prefix a phone number with the `whatsapp:` scheme unless already present.
pub fn whatsapp_address(phone: &str) -> String {
    let phone = phone.trim();
    if phone.starts_with("whatsapp:") {
        phone.to_string()
    } else {
        format!("whatsapp:{}", phone)
    }
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: Option<String>,
}

/// Sends WhatsApp messages through Twilio.
#[derive(Clone)]
pub struct TwilioWhatsApp {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioWhatsApp {
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &TwilioConfig {
        &self.config
    }
}

#[async_trait]
impl Notifier for TwilioWhatsApp {
    fn channel(&self) -> Channel {
        Channel::Whatsapp
    }

    async fn send(&self, recipient: &str, body: &str) -> Result<Delivery> {
        let to = whatsapp_address(recipient);
        let from = whatsapp_address(&self.config.from);

        debug!(to = %to, from = %from, "sending WhatsApp message");

        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .timeout(self.config.timeout)
            .form(&[("To", to.as_str()), ("From", from.as_str()), ("Body", body)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        // Accepted; an unreadable body must not turn into a resend.
        let sid = match response.json::<MessageResource>().await {
            Ok(resource) => resource.sid,
            Err(e) => {
                warn!(to = %to, error = %e, "could not read Twilio response body");
                None
            }
        };
        info!(to = %to, sid = ?sid, "WhatsApp message accepted");

        Ok(Delivery {
            channel: Channel::Whatsapp,
            provider_id: sid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Form, Json, Router};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Vec<(HeaderMap, HashMap<String, String>)>>>;

    const MESSAGES_ROUTE: &str = "/2010-04-01/Accounts/:sid/Messages.json";

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn fake_twilio(status: StatusCode) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new()
            .route(
                MESSAGES_ROUTE,
                post(
                    move |State(captured): State<Captured>,
                          headers: HeaderMap,
                          Form(form): Form<HashMap<String, String>>| async move {
                        captured.lock().unwrap().push((headers, form));
                        (status, Json(serde_json::json!({"sid": "SM123", "status": "queued"})))
                    },
                ),
            )
            .with_state(Arc::clone(&captured));

        (serve(app).await, captured)
    }

    /// Accepts with a body that is not the Messages JSON resource.
    async fn fake_twilio_plain_body() -> String {
        let app = Router::new().route(
            MESSAGES_ROUTE,
            post(|| async { (StatusCode::CREATED, "<Response>queued</Response>") }),
        );
        serve(app).await
    }

    /// Never answers within a test's patience.
    async fn fake_twilio_stalled() -> String {
        let app = Router::new().route(
            MESSAGES_ROUTE,
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                StatusCode::CREATED
            }),
        );
        serve(app).await
    }

    #[test]
    fn test_whatsapp_address() {
        assert_eq!(whatsapp_address("+919876543210"), "whatsapp:+919876543210");
        assert_eq!(whatsapp_address("whatsapp:+1555"), "whatsapp:+1555");
    }

    #[test]
    fn test_messages_url() {
        let config = TwilioConfig::new("AC1", "secret").with_base_url("http://localhost:9/");
        assert_eq!(
            config.messages_url(),
            "http://localhost:9/2010-04-01/Accounts/AC1/Messages.json"
        );
        assert_eq!(config.from, SANDBOX_SENDER);
    }

    #[tokio::test]
    async fn test_send_posts_form_with_basic_auth() {
        let (base_url, captured) = fake_twilio(StatusCode::CREATED).await;
        let notifier =
            TwilioWhatsApp::new(TwilioConfig::new("AC1", "secret").with_base_url(base_url));

        let delivery = notifier
            .send("+919876543210", "🔔 Reminder: call mom")
            .await
            .unwrap();

        assert_eq!(delivery.channel, Channel::Whatsapp);
        assert_eq!(delivery.provider_id.as_deref(), Some("SM123"));

        let captured = captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        let (headers, form) = &captured[0];
        assert!(headers
            .get("authorization")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("Basic "));
        assert_eq!(form["To"], "whatsapp:+919876543210");
        assert_eq!(form["From"], "whatsapp:+14155238886");
        assert_eq!(form["Body"], "🔔 Reminder: call mom");
    }

    #[tokio::test]
    async fn test_send_reports_rejection() {
        let (base_url, _) = fake_twilio(StatusCode::BAD_REQUEST).await;
        let notifier =
            TwilioWhatsApp::new(TwilioConfig::new("AC1", "secret").with_base_url(base_url));

        let err = notifier.send("+919876543210", "hi").await.unwrap_err();
        assert!(matches!(err, NotifyError::Rejected { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_accepted_with_unreadable_body_is_delivered() {
        let base_url = fake_twilio_plain_body().await;
        let notifier =
            TwilioWhatsApp::new(TwilioConfig::new("AC1", "secret").with_base_url(base_url));

        let delivery = notifier.send("+919876543210", "hi").await.unwrap();
        assert_eq!(delivery.channel, Channel::Whatsapp);
        assert!(delivery.provider_id.is_none());
    }

    #[tokio::test]
    async fn test_stalled_provider_times_out() {
        let base_url = fake_twilio_stalled().await;
        let notifier = TwilioWhatsApp::new(
            TwilioConfig::new("AC1", "secret")
                .with_base_url(base_url)
                .with_timeout(Duration::from_millis(100)),
        );

        let started = std::time::Instant::now();
        let err = notifier.send("+919876543210", "hi").await.unwrap_err();
        assert!(matches!(err, NotifyError::Timeout(_)), "got {:?}", err);
        assert!(err.delivery_unknown());
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
