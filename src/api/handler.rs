//! Lambda entrypoint - thin router that delegates to the webhook handlers.
//!
//! This module handles:
//! - Runtime selection (standard or edge request adapter), fixed at startup
//! - Webhook registration on the setup route (delegated to `webhook`)
//! - Update delivery on every other route (delegated to `updates`)

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use super::helpers::ProxyResponse;
use super::request::{EdgeRequest, LambdaRequest, Request};
use super::updates::{self, DeliveryOptions, UpdateReceiver};
use super::webhook::{self, WebhookOptions, WebhookSetup};
use crate::core::config::AppConfig;
use crate::core::models::RuntimeKind;
use crate::errors::HookError;
use crate::telegram::{BotClient, LogUpdates, TelegramBot, TelegramClient};

pub struct Router {
    runtime: RuntimeKind,
    setup_route: String,
    setup: WebhookSetup<dyn BotClient>,
    receiver: UpdateReceiver<dyn BotClient>,
}

impl Router {
    #[must_use]
    pub fn new(config: &AppConfig, bot: Arc<dyn BotClient>) -> Self {
        Self {
            runtime: config.runtime,
            setup_route: config.setup_route.clone(),
            setup: webhook::set_webhook(WebhookOptions::from_config(config, Arc::clone(&bot))),
            receiver: updates::start(bot).with_options(DeliveryOptions::from_config(config)),
        }
    }

    /// Builds the router with a logging Telegram bot from the environment.
    ///
    /// # Errors
    ///
    /// Returns `HookError::Config` if the environment is incomplete.
    pub fn from_env() -> Result<Self, HookError> {
        let config = AppConfig::from_env()?;
        let bot = TelegramBot::new(TelegramClient::from_config(&config)).on_update(LogUpdates);
        info!(runtime = ?config.runtime, setup_route = %config.setup_route, "Router configured");
        Ok(Self::new(&config, Arc::new(bot)))
    }

    #[must_use]
    pub fn is_setup_path(&self, path: &str) -> bool {
        let route = self.setup_route.trim_matches('/');
        if route.is_empty() {
            return false;
        }
        let path = path.trim_end_matches('/');
        path == route || path.ends_with(&format!("/{route}"))
    }

    fn request(&self, payload: &Value) -> Box<dyn Request> {
        match self.runtime {
            RuntimeKind::Standard => Box::new(LambdaRequest::from_event(payload)),
            RuntimeKind::Edge => Box::new(EdgeRequest::from_event(payload)),
        }
    }

    /// Dispatches one API Gateway proxy event.
    ///
    /// # Errors
    ///
    /// Returns any error the handlers did not emit as a response.
    pub async fn route(&self, payload: &Value) -> Result<Value, HookError> {
        let path = payload
            .get("rawPath")
            .and_then(Value::as_str)
            .or_else(|| payload.get("path").and_then(Value::as_str))
            .unwrap_or("/");
        info!(raw_path = %path, "Request path");

        let mut request = self.request(payload);
        if self.is_setup_path(path) {
            self.setup.handle(&*request, &ProxyResponse).await
        } else {
            self.receiver.handle(&mut *request, &ProxyResponse).await
        }
    }
}

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Unhandled handler errors become the invocation error.
#[tracing::instrument(level = "info", skip_all, fields(request_id = %event.context.request_id))]
pub async fn function_handler(router: &Router, event: LambdaEvent<Value>) -> Result<Value, Error> {
    router.route(&event.payload).await.map_err(|e| {
        error!("Request failed: {}", e);
        Error::from(e)
    })
}
