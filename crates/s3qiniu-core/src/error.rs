//! Error types for the s3qiniu gateway.

use http::StatusCode;

/// Errors reported by a [`MetadataProvider`](crate::MetadataProvider).
///
/// The `Display` text of every variant is what clients see in a `502` body,
/// so remote messages are rendered verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Remote {
        /// HTTP status returned by the backend.
        status: u16,
        /// Error text reported by the backend.
        message: String,
    },

    /// The backend could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a body that could not be understood.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// The backend knows no zone for this bucket.
    #[error("no zone available for bucket: {0}")]
    NoZone(String),
}

/// Top-level gateway error.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Invalid or incomplete configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The zone of a bucket could not be resolved.
    #[error(transparent)]
    ZoneResolution(ProviderError),

    /// The object metadata could not be fetched in stat mode.
    #[error(transparent)]
    Stat(ProviderError),

    /// A provider call did not finish within the request deadline.
    #[error("{0} timed out")]
    Timeout(&'static str),

    /// The request path does not address an object.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request path is malformed (e.g. a key that is not valid UTF-8 once decoded).
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl GatewayError {
    /// HTTP status code used when this error terminates a request.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ZoneResolution(_) | Self::Stat(_) => StatusCode::BAD_GATEWAY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convenience result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
