use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Could not resolve the webhook host")]
    MissingHost,

    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to read request body: {0}")]
    Body(String),

    #[error("Failed to send HTTP request: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("Secret token mismatch")]
    Unauthorized,

    #[error("Update handler failed: {0}")]
    Handler(String),
}

impl HookError {
    /// Numeric code reported in the error body. Bot API rejections keep
    /// their own code; everything else maps to an HTTP status.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            HookError::Config(_) | HookError::Handler(_) => 500,
            HookError::MissingHost | HookError::InvalidUrl(_) | HookError::Body(_) => 400,
            HookError::Http(_) => 502,
            HookError::Api { code, .. } => u16::try_from(*code)
                .ok()
                .filter(|c| (100..=599).contains(c))
                .unwrap_or(502),
            HookError::Unauthorized => 401,
        }
    }

    /// JSON body emitted when a handler catches this error.
    #[must_use]
    pub fn to_response(&self) -> Value {
        json!({
            "ok": false,
            "error_code": self.status_code(),
            "description": self.to_string(),
        })
    }
}

impl From<serde_json::Error> for HookError {
    fn from(error: serde_json::Error) -> Self {
        HookError::Body(error.to_string())
    }
}

impl From<anyhow::Error> for HookError {
    fn from(error: anyhow::Error) -> Self {
        HookError::Handler(error.to_string())
    }
}
