//! Command-line flags with environment fallbacks.

use std::convert::Infallible;

use clap::{ArgAction, Parser};
use s3qiniu_core::GatewayConfig;
use s3qiniu_core::config::{
    DEFAULT_LISTEN, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_UC_HOST, parse_bool,
};

/// S3-style gateway redirecting `/{bucket}/{key}` requests to Qiniu Kodo.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Listen address.
    #[arg(long, env = "S3QINIU_LISTEN", default_value = DEFAULT_LISTEN)]
    pub addr: String,

    /// Qiniu access key.
    #[arg(long = "access-key", env = "S3QINIU_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Qiniu secret key.
    #[arg(long = "secret-key", env = "S3QINIU_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Default bucket. Required unless wild mode is on.
    #[arg(long, env = "S3QINIU_BUCKET")]
    pub bucket: Option<String>,

    /// Reserved: enable a bucket listing page.
    #[arg(
        long = "enable-page",
        env = "S3QINIU_ENABLE_PAGE",
        default_value = "false",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = parse_flag,
    )]
    pub enable_page: bool,

    /// Allow any bucket to be addressed.
    #[arg(
        long = "wild-mode",
        env = "S3QINIU_WILD_MODE",
        default_value = "true",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = parse_flag,
    )]
    pub wild_mode: bool,

    /// Redirect to the HTTPS retrieval host of each zone.
    #[arg(
        long = "use-https",
        env = "S3QINIU_USE_HTTPS",
        default_value = "false",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = parse_flag,
    )]
    pub use_https: bool,

    /// Deadline for each backend call, in seconds.
    #[arg(
        long = "request-timeout-secs",
        env = "S3QINIU_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS,
    )]
    pub request_timeout_secs: u64,

    /// Qiniu UC endpoint used for zone queries.
    #[arg(long = "uc-host", env = "S3QINIU_UC_HOST", default_value = DEFAULT_UC_HOST)]
    pub uc_host: String,

    /// Log level filter (overridden by `RUST_LOG`).
    #[arg(long = "log-level", env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Probe a running gateway and exit with its health as status code.
    #[arg(long = "health-check")]
    pub health_check: bool,
}

impl Cli {
    /// Turn the parsed flags into a [`GatewayConfig`]. Validation is left to the caller.
    #[must_use]
    pub fn into_config(self) -> GatewayConfig {
        GatewayConfig::builder()
            .listen(self.addr)
            .access_key(self.access_key.unwrap_or_default())
            .secret_key(self.secret_key.unwrap_or_default())
            .default_bucket(self.bucket)
            .enable_page(self.enable_page)
            .wild_mode(self.wild_mode)
            .use_https(self.use_https)
            .request_timeout_secs(self.request_timeout_secs)
            .uc_host(self.uc_host)
            .log_level(self.log_level)
            .build()
    }
}

fn parse_flag(value: &str) -> Result<bool, Infallible> {
    Ok(parse_bool(value))
}
