use subtle::ConstantTimeEq;
use tracing::error;

use super::request::Request;

/// Header Telegram echoes the webhook `secret_token` in.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

pub fn verify_secret_token<R>(request: &R, expected: &str) -> bool
where
    R: Request + ?Sized,
{
    let Some(received) = request.header(SECRET_TOKEN_HEADER) else {
        error!("Missing {} header", SECRET_TOKEN_HEADER);
        return false;
    };

    if bool::from(received.as_bytes().ct_eq(expected.as_bytes())) {
        true
    } else {
        error!("Secret token verification failed");
        false
    }
}
