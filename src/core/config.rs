use std::env;

use super::models::{EnvHosts, RuntimeKind};
use crate::errors::HookError;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_SETUP_ROUTE: &str = "/setWebhook";
pub const DEFAULT_HOST_HEADER: &str = "x-forwarded-host";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 100;

/// Environment variable holding the deployment environment name.
pub const DEPLOYMENT_ENV_VAR: &str = "VERCEL_ENV";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bot_token: String,
    pub api_url: String,
    pub webhook_path: String,
    pub setup_route: String,
    pub hosts: EnvHosts,
    pub host_header: String,
    pub certificate: Option<String>,
    pub allowed_updates: Option<Vec<String>>,
    pub max_connections: u32,
    pub secret_token: Option<String>,
    pub webhook_handle_errors: bool,
    pub updates_handle_errors: bool,
    pub runtime: RuntimeKind,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `HookError::Config` if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, HookError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HookError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| HookError::Config("TELEGRAM_BOT_TOKEN: not set".to_string()))?;

        let hosts = match lookup("WEBHOOK_HOSTS") {
            Some(raw) => parse_hosts(&raw)?,
            None => EnvHosts::new(),
        };

        let max_connections = match lookup("WEBHOOK_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| {
                HookError::Config(format!("WEBHOOK_MAX_CONNECTIONS: {e}"))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let runtime = match lookup("BOT_RUNTIME") {
            Some(raw) => RuntimeKind::parse(&raw)
                .ok_or_else(|| HookError::Config(format!("BOT_RUNTIME: unknown runtime '{raw}'")))?,
            None => RuntimeKind::default(),
        };

        Ok(Self {
            bot_token,
            api_url: lookup("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            webhook_path: lookup("WEBHOOK_PATH").unwrap_or_default(),
            setup_route: lookup("WEBHOOK_SETUP_ROUTE")
                .unwrap_or_else(|| DEFAULT_SETUP_ROUTE.to_string()),
            hosts,
            host_header: lookup("WEBHOOK_HOST_HEADER")
                .unwrap_or_else(|| DEFAULT_HOST_HEADER.to_string()),
            certificate: lookup("WEBHOOK_CERTIFICATE").filter(|c| !c.is_empty()),
            allowed_updates: lookup("WEBHOOK_ALLOWED_UPDATES").map(|raw| parse_allowed_updates(&raw)),
            max_connections,
            secret_token: lookup("WEBHOOK_SECRET_TOKEN").filter(|s| !s.is_empty()),
            webhook_handle_errors: parse_flag(lookup("WEBHOOK_HANDLE_ERRORS").as_deref(), true),
            updates_handle_errors: parse_flag(lookup("UPDATES_HANDLE_ERRORS").as_deref(), false),
            runtime,
        })
    }
}

/// Reads the current deployment environment name, if any.
#[must_use]
pub fn deployment_environment() -> Option<String> {
    env::var(DEPLOYMENT_ENV_VAR).ok()
}

fn parse_hosts(raw: &str) -> Result<EnvHosts, HookError> {
    if raw.trim().is_empty() {
        return Ok(EnvHosts::new());
    }
    serde_json::from_str(raw).map_err(|e| HookError::Config(format!("WEBHOOK_HOSTS: {e}")))
}

fn parse_allowed_updates(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_token() {
        let config = AppConfig::from_lookup(lookup_from(&[("TELEGRAM_BOT_TOKEN", "123:abc")]))
            .unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.webhook_path, "");
        assert_eq!(config.setup_route, DEFAULT_SETUP_ROUTE);
        assert!(config.hosts.is_empty());
        assert_eq!(config.host_header, DEFAULT_HOST_HEADER);
        assert_eq!(config.max_connections, 100);
        assert!(config.certificate.is_none());
        assert!(config.allowed_updates.is_none());
        assert!(config.webhook_handle_errors);
        assert!(!config.updates_handle_errors);
        assert_eq!(config.runtime, RuntimeKind::Standard);
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, HookError::Config(msg) if msg.contains("TELEGRAM_BOT_TOKEN")));
    }

    #[test]
    fn test_full_config() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("WEBHOOK_HOSTS", r#"{"production": "bot.example.com"}"#),
            ("WEBHOOK_ALLOWED_UPDATES", "message, callback_query,,"),
            ("WEBHOOK_MAX_CONNECTIONS", " 40 "),
            ("WEBHOOK_HANDLE_ERRORS", "off"),
            ("UPDATES_HANDLE_ERRORS", "TRUE"),
            ("BOT_RUNTIME", "Edge"),
        ]))
        .unwrap();

        assert_eq!(
            config.hosts.get("production").map(String::as_str),
            Some("bot.example.com")
        );
        assert_eq!(
            config.allowed_updates,
            Some(vec!["message".to_string(), "callback_query".to_string()])
        );
        assert_eq!(config.max_connections, 40);
        assert!(!config.webhook_handle_errors);
        assert!(config.updates_handle_errors);
        assert_eq!(config.runtime, RuntimeKind::Edge);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let bad_hosts = AppConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("WEBHOOK_HOSTS", "[1, 2]"),
        ]));
        assert!(matches!(bad_hosts, Err(HookError::Config(_))));

        let bad_runtime = AppConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("BOT_RUNTIME", "deno"),
        ]));
        assert!(matches!(bad_runtime, Err(HookError::Config(_))));

        let bad_max = AppConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("WEBHOOK_MAX_CONNECTIONS", "lots"),
        ]));
        assert!(matches!(bad_max, Err(HookError::Config(_))));
    }

    #[test]
    fn test_unrecognised_flag_keeps_default() {
        assert!(parse_flag(Some("maybe"), true));
        assert!(!parse_flag(None, false));
    }
}
