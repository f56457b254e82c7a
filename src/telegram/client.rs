//! Telegram Bot API client
//!
//! Thin HTTP wrapper over `https://api.telegram.org/bot<token>/<method>` with
//! retry on transport failures.

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use crate::core::config::AppConfig;
use crate::core::models::WebhookParams;
use crate::errors::HookError;

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Envelope every Bot API method answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ApiResponse {
    /// Converts the envelope into the raw body on success, or an API error.
    ///
    /// # Errors
    ///
    /// Returns `HookError::Api` when `ok` is false.
    pub fn into_result(self, raw: Value) -> Result<Value, HookError> {
        if self.ok {
            Ok(raw)
        } else {
            Err(HookError::Api {
                code: self.error_code.unwrap_or(0),
                description: self
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            })
        }
    }
}

/// Build the JSON payload for `setWebhook` (no certificate upload).
#[must_use]
pub fn build_set_webhook_payload(params: &WebhookParams) -> Value {
    let mut payload = json!({
        "url": params.url.as_str(),
        "max_connections": params.max_connections,
    });

    if let Some(updates) = &params.allowed_updates {
        payload["allowed_updates"] = json!(updates);
    }

    if let Some(secret) = &params.secret_token {
        payload["secret_token"] = Value::String(secret.clone());
    }

    payload
}

/// Build the multipart form for `setWebhook` with a certificate upload.
fn build_set_webhook_form(params: &WebhookParams, certificate: &str) -> Form {
    let mut form = Form::new()
        .text("url", params.url.to_string())
        .text("max_connections", params.max_connections.to_string())
        .part(
            "certificate",
            Part::bytes(certificate.as_bytes().to_vec()).file_name("certificate.pem"),
        );

    if let Some(updates) = &params.allowed_updates {
        form = form.text("allowed_updates", json!(updates).to_string());
    }

    if let Some(secret) = &params.secret_token {
        form = form.text("secret_token", secret.clone());
    }

    form
}

fn is_transient(error: &HookError) -> bool {
    matches!(error, HookError::Http(_))
}

/// Telegram Bot API client with retry logic and error handling
#[derive(Debug, Clone)]
pub struct TelegramClient {
    api_url: String,
    token: String,
}

impl TelegramClient {
    #[must_use]
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.api_url.clone(), config.bot_token.clone())
    }

    #[must_use]
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    async fn with_retry<F, Fut>(&self, mut operation: F) -> Result<Value, HookError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<Value, HookError>> + Send,
    {
        let strategy = ExponentialBackoff::from_millis(100).map(jitter).take(5);

        // Non-transient failures resolve the attempt so only transport errors retry.
        Retry::spawn(strategy, || {
            let attempt = operation();
            async move {
                match attempt.await {
                    Err(e) if is_transient(&e) => Err(e),
                    settled => Ok(settled),
                }
            }
        })
        .await?
    }

    async fn decode(response: reqwest::Response) -> Result<Value, HookError> {
        let raw: Value = response.json().await?;
        let envelope: ApiResponse = serde_json::from_value(raw.clone())?;
        envelope.into_result(raw)
    }

    /// Calls an arbitrary Bot API method with a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `HookError::Http` on transport failure (after retries) and
    /// `HookError::Api` when Telegram rejects the call.
    pub async fn call_method(&self, method: &str, payload: &Value) -> Result<Value, HookError> {
        let url = self.method_url(method);
        debug!(method, "Calling Telegram API");

        self.with_retry(|| async {
            let response = HTTP_CLIENT.post(&url).json(payload).send().await?;
            Self::decode(response).await
        })
        .await
        .inspect_err(|e| warn!(method, "Telegram API call failed: {}", e))
    }

    /// Registers (or overwrites) the webhook.
    ///
    /// # Errors
    ///
    /// Same as [`TelegramClient::call_method`].
    pub async fn set_webhook(&self, params: &WebhookParams) -> Result<Value, HookError> {
        let Some(certificate) = params.certificate.as_deref() else {
            return self
                .call_method("setWebhook", &build_set_webhook_payload(params))
                .await;
        };

        let url = self.method_url("setWebhook");
        self.with_retry(|| async {
            let form = build_set_webhook_form(params, certificate);
            let response = HTTP_CLIENT.post(&url).multipart(form).send().await?;
            Self::decode(response).await
        })
        .await
        .inspect_err(|e| warn!("setWebhook with certificate failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn params() -> WebhookParams {
        WebhookParams {
            url: Url::parse("https://example.com/webhook").unwrap(),
            certificate: None,
            allowed_updates: None,
            max_connections: 100,
            secret_token: None,
        }
    }

    #[test]
    fn test_method_url_strips_trailing_slash() {
        let client = TelegramClient::new("https://api.telegram.org/", "123:abc");
        assert_eq!(
            client.method_url("setWebhook"),
            "https://api.telegram.org/bot123:abc/setWebhook"
        );
    }

    #[test]
    fn test_build_set_webhook_payload_minimal() {
        let payload = build_set_webhook_payload(&params());

        assert_eq!(payload["url"], "https://example.com/webhook");
        assert_eq!(payload["max_connections"], 100);
        assert!(payload.get("allowed_updates").is_none());
        assert!(payload.get("secret_token").is_none());
    }

    #[test]
    fn test_build_set_webhook_payload_with_options() {
        let mut p = params();
        p.allowed_updates = Some(vec!["message".to_string()]);
        p.secret_token = Some("s3cret".to_string());
        p.max_connections = 10;

        let payload = build_set_webhook_payload(&p);

        assert_eq!(payload["allowed_updates"], json!(["message"]));
        assert_eq!(payload["secret_token"], "s3cret");
        assert_eq!(payload["max_connections"], 10);
    }

    #[test]
    fn test_api_response_success() {
        let raw = json!({"ok": true, "result": true, "description": "Webhook was set"});
        let envelope: ApiResponse = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(envelope.into_result(raw.clone()).unwrap(), raw);
    }

    #[test]
    fn test_api_response_rejection() {
        let raw = json!({"ok": false, "error_code": 401, "description": "Unauthorized"});
        let envelope: ApiResponse = serde_json::from_value(raw.clone()).unwrap();

        match envelope.into_result(raw) {
            Err(HookError::Api { code, description }) => {
                assert_eq!(code, 401);
                assert_eq!(description, "Unauthorized");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_only_transport_errors_are_retried() {
        assert!(!is_transient(&HookError::Api {
            code: 400,
            description: "bad".to_string()
        }));
        assert!(!is_transient(&HookError::MissingHost));
    }
}
