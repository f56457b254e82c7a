//! Update delivery handler and its factory.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::helpers::{Respond, catch_error, status_false};
use super::request::Request;
use super::signature::verify_secret_token;
use crate::core::config::AppConfig;
use crate::errors::HookError;
use crate::telegram::BotClient;

#[derive(Debug, Clone, Default)]
pub struct DeliveryOptions {
    /// Emit errors as the response body instead of returning them.
    pub handle_errors: bool,
    /// When set, deliveries must carry it in `x-telegram-bot-api-secret-token`.
    pub secret_token: Option<String>,
}

impl DeliveryOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            handle_errors: config.updates_handle_errors,
            secret_token: config.secret_token.clone(),
        }
    }
}

/// JSON truthiness: null, false, 0 and "" are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[must_use]
pub fn has_update_id(body: &Value) -> bool {
    body.get("update_id").is_some_and(is_truthy)
}

async fn deliver<B, R>(bot: &B, options: &DeliveryOptions, request: &mut R) -> Result<Value, HookError>
where
    B: BotClient + ?Sized,
    R: Request + ?Sized,
{
    if let Some(expected) = options.secret_token.as_deref() {
        if !verify_secret_token(request, expected) {
            return Err(HookError::Unauthorized);
        }
    }

    let body = request.body().await?;
    if !has_update_id(&body) {
        debug!("Delivery without update_id ignored");
        return Ok(status_false());
    }

    bot.receive_updates(vec![body]).await
}

/// Forwards a single inbound update to the bot.
///
/// # Errors
///
/// Returns body-reading, authorization or bot errors unless
/// `options.handle_errors` is set.
#[tracing::instrument(level = "info", skip_all)]
pub async fn start_handler<B, R, O>(
    bot: &B,
    options: &DeliveryOptions,
    request: &mut R,
    respond: &O,
) -> Result<Value, HookError>
where
    B: BotClient + ?Sized,
    R: Request + ?Sized,
    O: Respond + ?Sized,
{
    match deliver(bot, options, request).await {
        Ok(result) => Ok(respond.json(result)),
        Err(e) => catch_error(e, options.handle_errors, respond),
    }
}

/// Delivery handler bound to a bot.
pub struct UpdateReceiver<B: ?Sized> {
    bot: Arc<B>,
    options: DeliveryOptions,
}

impl<B: BotClient + ?Sized> UpdateReceiver<B> {
    #[must_use]
    pub fn with_options(mut self, options: DeliveryOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> &DeliveryOptions {
        &self.options
    }

    /// # Errors
    ///
    /// See [`start_handler`].
    pub async fn handle<R, O>(&self, request: &mut R, respond: &O) -> Result<Value, HookError>
    where
        R: Request + ?Sized,
        O: Respond + ?Sized,
    {
        start_handler(self.bot.as_ref(), &self.options, request, respond).await
    }
}

/// Webhook handler factory.
#[must_use]
pub fn start<B: BotClient + ?Sized>(bot: Arc<B>) -> UpdateReceiver<B> {
    UpdateReceiver {
        bot,
        options: DeliveryOptions::default(),
    }
}
