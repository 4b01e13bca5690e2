//! Response construction for every outcome of a gateway request.

use bytes::Bytes;
use http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, LOCATION};
use http::{HeaderValue, StatusCode};
use http_body_util::Full;
use s3qiniu_core::{GatewayError, StatResult};

/// Every gateway response is fully buffered: stat JSON, error text, or nothing.
pub type GatewayResponse = http::Response<Full<Bytes>>;

/// `307 Temporary Redirect` to the retrieval URL, readable cross-origin.
///
/// # Errors
///
/// Returns [`GatewayError::Internal`] if `location` is not a valid header value.
pub fn redirect_response(location: &str) -> Result<GatewayResponse, GatewayError> {
    let location = HeaderValue::from_str(location)
        .map_err(|e| anyhow::anyhow!("invalid redirect location {location}: {e}"))?;
    http::Response::builder()
        .status(StatusCode::TEMPORARY_REDIRECT)
        .header(LOCATION, location)
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Full::default())
        .map_err(|e| GatewayError::Internal(e.into()))
}

/// `200 OK` carrying the stat result as JSON.
///
/// # Errors
///
/// Returns [`GatewayError::Internal`] if the result cannot be serialized.
pub fn stat_response(stat: &StatResult) -> Result<GatewayResponse, GatewayError> {
    let body = serde_json::to_vec(stat).map_err(|e| GatewayError::Internal(e.into()))?;
    http::Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(Full::new(Bytes::from(body)))
        .map_err(|e| GatewayError::Internal(e.into()))
}

/// Plain-text error response whose body is the error's display text.
#[must_use]
pub fn error_to_response(err: &GatewayError) -> GatewayResponse {
    let mut response = http::Response::new(Full::new(Bytes::from(err.to_string())));
    *response.status_mut() = err.status_code();
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// Produce a health check response.
#[must_use]
pub fn health_check_response() -> GatewayResponse {
    http::Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(Full::new(Bytes::from_static(
            br#"{"status":"running","service":"s3qiniu"}"#,
        )))
        .expect("static health response should be valid")
}
