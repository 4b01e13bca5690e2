//! Request routing: maps an incoming request onto a [`Route`].
//!
//! Object requests are path-style only: the first path segment is the bucket
//! and everything after the next `/` is the key. Keys may contain `/`. Any
//! HTTP method is accepted and treated as a read.

use percent_encoding::percent_decode_str;
use s3qiniu_core::{GatewayError, RequestContext};

/// Query parameter that switches the response from a redirect to JSON metadata.
pub const STAT_PARAM: &str = "stat";

/// Where a request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Liveness probe.
    Health,
    /// Object access under `/{bucket}/{key}`.
    Object(RequestContext),
}

/// Resolve a request to its [`Route`].
///
/// # Errors
///
/// Returns [`GatewayError::NotFound`] when the path does not carry both a
/// bucket and a non-empty key, and [`GatewayError::InvalidPath`] when a
/// segment does not decode to UTF-8.
pub fn route<B>(req: &http::Request<B>) -> Result<Route, GatewayError> {
    let path = req.uri().path();

    if is_health_check(req.method(), path) {
        return Ok(Route::Health);
    }

    let (bucket, key) = match parse_path(path)? {
        (Some(bucket), Some(key)) if !bucket.is_empty() => (bucket, key),
        _ => return Err(GatewayError::NotFound(path.to_owned())),
    };

    let want_stat = req
        .uri()
        .query()
        .is_some_and(|q| query_value(q, STAT_PARAM).as_deref() == Some("true"));

    Ok(Route::Object(RequestContext {
        bucket,
        key,
        want_stat,
    }))
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}

/// Split a path into its percent-decoded bucket and key.
fn parse_path(path: &str) -> Result<(Option<String>, Option<String>), GatewayError> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Ok((None, None));
    }

    let parsed = match trimmed.split_once('/') {
        Some((bucket, key_raw)) => {
            let key = if key_raw.is_empty() {
                None
            } else {
                Some(decode_uri_component(key_raw, path)?)
            };
            (Some(decode_uri_component(bucket, path)?), key)
        }
        None => (Some(decode_uri_component(trimmed, path)?), None),
    };
    Ok(parsed)
}

/// Decode a percent-encoded URI component. Invalid UTF-8 is rejected, never replaced.
fn decode_uri_component(s: &str, path: &str) -> Result<String, GatewayError> {
    percent_decode_str(s)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| GatewayError::InvalidPath(path.to_owned()))
}

/// First value of a query parameter.
fn query_value(query: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
