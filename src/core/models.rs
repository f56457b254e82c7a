use std::collections::HashMap;
use url::Url;

/// Hostname overrides keyed by deployment environment (`production`,
/// `preview`, `development`, ...).
pub type EnvHosts = HashMap<String, String>;

/// Which request adapter the entrypoint builds for each invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuntimeKind {
    /// Body arrives inside the event, already a string or JSON value.
    #[default]
    Standard,
    /// Body arrives as a byte stream that must be drained and decoded.
    Edge,
}

impl RuntimeKind {
    /// Parses `standard` / `edge`, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "standard" | "node" | "nodejs" => Some(Self::Standard),
            "edge" => Some(Self::Edge),
            _ => None,
        }
    }
}

/// Arguments of a `setWebhook` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookParams {
    pub url: Url,
    pub certificate: Option<String>,
    pub allowed_updates: Option<Vec<String>>,
    pub max_connections: u32,
    pub secret_token: Option<String>,
}
