//! Webhook handlers and the Lambda entrypoint

pub mod handler;
pub mod helpers;
pub mod host;
pub mod request;
pub mod signature;
pub mod updates;
pub mod webhook;

// Re-export the main entry points for convenience
pub use handler::{Router, function_handler};
pub use helpers::{Passthrough, ProxyResponse, Respond};
pub use host::{get_host, resolve_host};
pub use request::{EdgeRequest, LambdaRequest, Request};
pub use updates::{DeliveryOptions, UpdateReceiver, start, start_handler};
pub use webhook::{WebhookOptions, WebhookSetup, set_webhook, set_webhook_handler, webhook_url};
