//! Webhook registration handler and its factory.

use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use url::Url;

use super::helpers::{Respond, catch_error};
use super::host::{DEFAULT_HOST_HEADER, get_host};
use super::request::Request;
use crate::core::config::{AppConfig, DEFAULT_MAX_CONNECTIONS};
use crate::core::models::{EnvHosts, WebhookParams};
use crate::errors::HookError;
use crate::telegram::BotClient;

/// Fixed arguments of the registration handler.
pub struct WebhookOptions<B: ?Sized> {
    pub bot: Arc<B>,
    /// Path joined against `https://<host>`; relative paths resolve from the root.
    pub path: String,
    pub hosts: EnvHosts,
    /// Header carrying the public host when no override matches.
    pub header: String,
    /// PEM certificate for self-signed endpoints.
    pub certificate: Option<String>,
    pub allowed_updates: Option<Vec<String>>,
    pub max_connections: u32,
    pub secret_token: Option<String>,
    /// Emit errors as the response body instead of returning them.
    pub handle_errors: bool,
}

impl<B: ?Sized> Clone for WebhookOptions<B> {
    fn clone(&self) -> Self {
        Self {
            bot: Arc::clone(&self.bot),
            path: self.path.clone(),
            hosts: self.hosts.clone(),
            header: self.header.clone(),
            certificate: self.certificate.clone(),
            allowed_updates: self.allowed_updates.clone(),
            max_connections: self.max_connections,
            secret_token: self.secret_token.clone(),
            handle_errors: self.handle_errors,
        }
    }
}

impl<B: BotClient + ?Sized> WebhookOptions<B> {
    #[must_use]
    pub fn new(bot: Arc<B>) -> Self {
        Self {
            bot,
            path: String::new(),
            hosts: EnvHosts::new(),
            header: DEFAULT_HOST_HEADER.to_string(),
            certificate: None,
            allowed_updates: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            secret_token: None,
            handle_errors: true,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig, bot: Arc<B>) -> Self {
        Self {
            bot,
            path: config.webhook_path.clone(),
            hosts: config.hosts.clone(),
            header: config.host_header.clone(),
            certificate: config.certificate.clone(),
            allowed_updates: config.allowed_updates.clone(),
            max_connections: config.max_connections,
            secret_token: config.secret_token.clone(),
            handle_errors: config.webhook_handle_errors,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_hosts(mut self, hosts: EnvHosts) -> Self {
        self.hosts = hosts;
        self
    }

    #[must_use]
    pub fn with_handle_errors(mut self, handle_errors: bool) -> Self {
        self.handle_errors = handle_errors;
        self
    }

    fn params(&self, url: Url) -> WebhookParams {
        WebhookParams {
            url,
            certificate: self.certificate.clone(),
            allowed_updates: self.allowed_updates.clone(),
            max_connections: self.max_connections,
            secret_token: self.secret_token.clone(),
        }
    }
}

/// Joins `path` against `https://<host>`.
///
/// # Errors
///
/// Returns `HookError::InvalidUrl` if the host or path do not form a URL.
pub fn webhook_url(host: &str, path: &str) -> Result<Url, HookError> {
    let base = Url::parse(&format!("https://{host}"))?;
    Ok(base.join(path)?)
}

async fn register<B, R>(options: &WebhookOptions<B>, request: &R) -> Result<Value, HookError>
where
    B: BotClient + ?Sized,
    R: Request + ?Sized,
{
    let host = get_host(&options.hosts, request, &options.header).ok_or(HookError::MissingHost)?;
    let url = webhook_url(&host, &options.path)?;
    info!(url = %url, "Registering webhook");

    options.bot.set_webhook(&options.params(url)).await
}

/// Registers the webhook for the host the request was made against.
///
/// # Errors
///
/// Returns the resolution or bot error unless `options.handle_errors` is set,
/// in which case the error is emitted as the response body.
#[tracing::instrument(level = "info", skip_all)]
pub async fn set_webhook_handler<B, R, O>(
    options: &WebhookOptions<B>,
    request: &R,
    respond: &O,
) -> Result<Value, HookError>
where
    B: BotClient + ?Sized,
    R: Request + ?Sized,
    O: Respond + ?Sized,
{
    match register(options, request).await {
        Ok(result) => Ok(respond.json(result)),
        Err(e) => catch_error(e, options.handle_errors, respond),
    }
}

/// Registration handler bound to fixed options.
pub struct WebhookSetup<B: ?Sized> {
    options: WebhookOptions<B>,
}

impl<B: BotClient + ?Sized> WebhookSetup<B> {
    #[must_use]
    pub fn options(&self) -> &WebhookOptions<B> {
        &self.options
    }

    /// # Errors
    ///
    /// See [`set_webhook_handler`].
    pub async fn handle<R, O>(&self, request: &R, respond: &O) -> Result<Value, HookError>
    where
        R: Request + ?Sized,
        O: Respond + ?Sized,
    {
        set_webhook_handler(&self.options, request, respond).await
    }
}

/// Webhook setup handler factory.
#[must_use]
pub fn set_webhook<B: BotClient + ?Sized>(options: WebhookOptions<B>) -> WebhookSetup<B> {
    WebhookSetup { options }
}
