//! Telehook - serverless webhook adapters for Telegram bots.
//!
//! This crate connects a single HTTP request/response cycle to a bot client:
//! 1. A registration handler that resolves the public host and calls `setWebhook`
//! 2. A delivery handler that forwards an inbound update to the bot
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda for serverless execution (API Gateway proxy events)
//! - reqwest for Telegram Bot API calls, retried with tokio-retry
//! - A `Request` trait with one adapter per hosting runtime (standard or edge)
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use telehook::api::{LambdaRequest, Passthrough, WebhookOptions, set_webhook, start};
//! use telehook::telegram::{LogUpdates, TelegramBot, TelegramClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     telehook::setup_logging();
//!
//!     let bot = Arc::new(
//!         TelegramBot::new(TelegramClient::new("https://api.telegram.org", "123:abc"))
//!             .on_update(LogUpdates),
//!     );
//!
//!     // Register https://<x-forwarded-host>/api/bot as the webhook
//!     let setup = set_webhook(WebhookOptions::new(Arc::clone(&bot)).with_path("api/bot"));
//!     let request = LambdaRequest::new(
//!         serde_json::json!({"x-forwarded-host": "bot.example.com"}),
//!         serde_json::Value::Null,
//!     );
//!     println!("{}", setup.handle(&request, &Passthrough).await?);
//!
//!     // Deliver an update
//!     let receiver = start(bot);
//!     let mut request = LambdaRequest::new(
//!         serde_json::json!({}),
//!         serde_json::json!({"update_id": 1, "message": {"text": "hi"}}),
//!     );
//!     println!("{}", receiver.handle(&mut request, &Passthrough).await?);
//!
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod api;
pub mod core;
pub mod errors;
pub mod telegram;

pub use errors::HookError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. Calling it again is a no-op.
///
/// # Example
///
/// ```
/// telehook::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
