use serde_json::{Value, json};
use telehook::api::host::DEFAULT_HOST_HEADER;
use telehook::api::{LambdaRequest, resolve_host};
use telehook::core::models::EnvHosts;

fn hosts() -> EnvHosts {
    EnvHosts::from([
        ("production".to_string(), "bot.example.com".to_string()),
        ("preview".to_string(), "preview.example.com".to_string()),
        ("development".to_string(), String::new()),
    ])
}

fn request_with(headers: Value) -> LambdaRequest {
    LambdaRequest::new(headers, Value::Null)
}

#[test]
fn test_override_wins_over_header() {
    let request = request_with(json!({"x-forwarded-host": "abc123.vercel.app"}));

    assert_eq!(
        resolve_host(Some("production"), &hosts(), &request, DEFAULT_HOST_HEADER),
        Some("bot.example.com".to_string())
    );
    assert_eq!(
        resolve_host(Some("preview"), &hosts(), &request, DEFAULT_HOST_HEADER),
        Some("preview.example.com".to_string())
    );
}

#[test]
fn test_override_used_without_any_headers() {
    let request = request_with(json!({}));

    assert_eq!(
        resolve_host(Some("production"), &hosts(), &request, DEFAULT_HOST_HEADER),
        Some("bot.example.com".to_string())
    );
}

#[test]
fn test_header_used_when_environment_has_no_override() {
    let request = request_with(json!({"x-forwarded-host": "abc123.vercel.app"}));

    assert_eq!(
        resolve_host(Some("staging"), &hosts(), &request, DEFAULT_HOST_HEADER),
        Some("abc123.vercel.app".to_string())
    );
    assert_eq!(
        resolve_host(None, &hosts(), &request, DEFAULT_HOST_HEADER),
        Some("abc123.vercel.app".to_string())
    );
}

#[test]
fn test_empty_override_falls_back_to_header() {
    let request = request_with(json!({"x-forwarded-host": "localhost:3000"}));

    assert_eq!(
        resolve_host(Some("development"), &hosts(), &request, DEFAULT_HOST_HEADER),
        Some("localhost:3000".to_string())
    );
}

#[test]
fn test_missing_header_is_none() {
    let request = request_with(json!({"host": "internal"}));

    assert_eq!(
        resolve_host(None, &EnvHosts::new(), &request, DEFAULT_HOST_HEADER),
        None
    );
}

#[test]
fn test_custom_header_name_is_case_insensitive() {
    let request = request_with(json!({
        "Host": "origin.example.com",
        "x-forwarded-host": "proxy.example.com"
    }));

    assert_eq!(
        resolve_host(None, &EnvHosts::new(), &request, "host"),
        Some("origin.example.com".to_string())
    );
}
