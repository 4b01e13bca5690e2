//! Gateway configuration.
//!
//! Provides [`GatewayConfig`]. Values are normally produced by the server
//! binary from command-line flags with environment fallbacks; this module only
//! owns the shape, the defaults and the startup validation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{GatewayError, GatewayResult};

/// Default bind address.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8082";

/// Default Qiniu UC endpoint used for zone queries.
pub const DEFAULT_UC_HOST: &str = "https://uc.qbox.me";

/// Default deadline applied to each provider call, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Gateway configuration.
///
/// `default_bucket`, `enable_page` and `wild_mode` are reserved: they take
/// part in startup validation but no request handling consults them.
///
/// # Examples
///
/// ```
/// use s3qiniu_core::config::GatewayConfig;
///
/// let config = GatewayConfig::builder()
///     .access_key("ak".into())
///     .secret_key("sk".into())
///     .build();
/// assert_eq!(config.listen, "0.0.0.0:8082");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Bind address (e.g. `"0.0.0.0:8082"`).
    #[builder(default = String::from(DEFAULT_LISTEN))]
    pub listen: String,

    /// Qiniu access key.
    pub access_key: String,

    /// Qiniu secret key.
    #[serde(skip_serializing)]
    pub secret_key: String,

    /// Default bucket. Required when wild mode is off.
    #[builder(default)]
    pub default_bucket: Option<String>,

    /// Reserved flag for a bucket listing page.
    #[builder(default = false)]
    pub enable_page: bool,

    /// Allow any bucket to be addressed dynamically.
    #[builder(default = true)]
    pub wild_mode: bool,

    /// Pick the HTTPS variant of the zone's retrieval host.
    #[builder(default = false)]
    pub use_https: bool,

    /// Deadline for each provider call, in seconds.
    #[builder(default = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    /// Base URL of the Qiniu UC service.
    #[builder(default = String::from(DEFAULT_UC_HOST))]
    pub uc_host: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("listen", &self.listen)
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("default_bucket", &self.default_bucket)
            .field("enable_page", &self.enable_page)
            .field("wild_mode", &self.wild_mode)
            .field("use_https", &self.use_https)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("uc_host", &self.uc_host)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl GatewayConfig {
    /// Check the configuration once before serving.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] when a credential is missing, when
    /// neither a default bucket nor wild mode is configured, or when the
    /// request timeout is zero.
    pub fn validate(&self) -> GatewayResult<()> {
        if self.access_key.is_empty() {
            return Err(GatewayError::Config("empty access key".to_owned()));
        }
        if self.secret_key.is_empty() {
            return Err(GatewayError::Config("empty secret key".to_owned()));
        }
        let has_bucket = self
            .default_bucket
            .as_deref()
            .is_some_and(|b| !b.is_empty());
        if !has_bucket && !self.wild_mode {
            return Err(GatewayError::Config(
                "you must offer a bucket name or use wild mode".to_owned(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(GatewayError::Config(
                "request timeout must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }

    /// Deadline applied to each provider call.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
