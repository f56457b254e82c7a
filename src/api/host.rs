use super::request::Request;
use crate::core::config::deployment_environment;
use crate::core::models::EnvHosts;

pub use crate::core::config::DEFAULT_HOST_HEADER;

/// Resolves the public host for the current deployment environment.
///
/// An override in `hosts` for the environment named by `VERCEL_ENV` wins;
/// otherwise the value of the `header` request header is used.
pub fn get_host<R>(hosts: &EnvHosts, request: &R, header: &str) -> Option<String>
where
    R: Request + ?Sized,
{
    resolve_host(deployment_environment().as_deref(), hosts, request, header)
}

/// Same as [`get_host`] with the environment passed in.
pub fn resolve_host<R>(
    environment: Option<&str>,
    hosts: &EnvHosts,
    request: &R,
    header: &str,
) -> Option<String>
where
    R: Request + ?Sized,
{
    if let Some(host) = environment
        .and_then(|env| hosts.get(env))
        .filter(|host| !host.is_empty())
    {
        return Some(host.clone());
    }
    request.header(header).map(ToString::to_string)
}
