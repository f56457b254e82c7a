use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

use super::client::TelegramClient;
use crate::core::models::WebhookParams;
use crate::errors::HookError;

/// What the webhook handlers need from a bot.
#[async_trait]
pub trait BotClient: Send + Sync {
    /// Registers `params.url` as the delivery target, replacing any previous one.
    async fn set_webhook(&self, params: &WebhookParams) -> Result<Value, HookError>;

    /// Processes a batch of inbound updates.
    async fn receive_updates(&self, updates: Vec<Value>) -> Result<Value, HookError>;
}

/// Callback run for every inbound update.
#[async_trait]
pub trait UpdateHandler: Send + Sync {
    async fn handle(&self, client: &TelegramClient, update: &Value) -> Result<Value, HookError>;
}

/// Names the payload field carrying the update, e.g. `message` or `callback_query`.
#[must_use]
pub fn update_kind(update: &Value) -> Option<&str> {
    update
        .as_object()?
        .keys()
        .map(String::as_str)
        .find(|k| *k != "update_id")
}

/// Logs every update and acknowledges it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogUpdates;

#[async_trait]
impl UpdateHandler for LogUpdates {
    async fn handle(&self, _client: &TelegramClient, update: &Value) -> Result<Value, HookError> {
        let update_id = update.get("update_id").cloned().unwrap_or_default();
        info!(
            update_id = %update_id,
            kind = update_kind(update).unwrap_or("unknown"),
            "Received update"
        );
        Ok(json!({ "ok": true }))
    }
}

/// Telegram bot: API client plus the handlers updates are dispatched to.
pub struct TelegramBot {
    client: TelegramClient,
    handlers: Vec<Arc<dyn UpdateHandler>>,
}

impl TelegramBot {
    #[must_use]
    pub fn new(client: TelegramClient) -> Self {
        Self {
            client,
            handlers: Vec::new(),
        }
    }

    /// Adds a handler; handlers run in registration order.
    #[must_use]
    pub fn on_update(mut self, handler: impl UpdateHandler + 'static) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    #[must_use]
    pub fn client(&self) -> &TelegramClient {
        &self.client
    }
}

#[async_trait]
impl BotClient for TelegramBot {
    async fn set_webhook(&self, params: &WebhookParams) -> Result<Value, HookError> {
        self.client.set_webhook(params).await
    }

    async fn receive_updates(&self, updates: Vec<Value>) -> Result<Value, HookError> {
        let mut results = Vec::with_capacity(updates.len());
        for update in &updates {
            let mut outputs = Vec::with_capacity(self.handlers.len());
            for handler in &self.handlers {
                outputs.push(handler.handle(&self.client, update).await?);
            }
            results.push(Value::Array(outputs));
        }
        Ok(Value::Array(results))
    }
}
