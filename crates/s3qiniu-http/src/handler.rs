//! Object request handling.
//!
//! [`GatewayHandler`] serves one routed object request in a single pass:
//!
//! 1. Resolve the bucket's zone through the [`ZoneCache`]
//! 2. Build the retrieval URL from the zone host and the encoded entry
//! 3. Either fetch and return the object metadata (`stat=true`) or redirect
//!
//! Each provider call runs under the configured deadline. Dropping the
//! returned future (client gone) cancels the call in flight.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use s3qiniu_core::config::DEFAULT_REQUEST_TIMEOUT_SECS;
use s3qiniu_core::{GatewayConfig, GatewayError, MetadataProvider, RequestContext, ZoneCache};
use tracing::{debug, warn};

use crate::response::{GatewayResponse, error_to_response, redirect_response, stat_response};

/// Per-request behavior knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Pick the HTTPS variant of the zone's retrieval host.
    pub use_https: bool,
    /// Deadline applied to each provider call.
    pub request_timeout: Duration,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            use_https: false,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl From<&GatewayConfig> for HandlerConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            use_https: config.use_https,
            request_timeout: config.request_timeout(),
        }
    }
}

/// Serves object requests against a shared zone cache.
#[derive(Clone)]
pub struct GatewayHandler {
    zones: Arc<ZoneCache>,
    provider: Arc<dyn MetadataProvider>,
    config: HandlerConfig,
}

impl std::fmt::Debug for GatewayHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayHandler")
            .field("zones", &self.zones)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GatewayHandler {
    /// Create a handler. `zones` must read through to `provider`.
    #[must_use]
    pub fn new(
        zones: Arc<ZoneCache>,
        provider: Arc<dyn MetadataProvider>,
        config: HandlerConfig,
    ) -> Self {
        Self {
            zones,
            provider,
            config,
        }
    }

    /// The zone cache shared by all requests.
    #[must_use]
    pub fn zones(&self) -> &Arc<ZoneCache> {
        &self.zones
    }

    /// Serve one object request. Failures become plain-text error responses.
    pub async fn handle(&self, ctx: &RequestContext) -> GatewayResponse {
        match self.try_handle(ctx).await {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    bucket = %ctx.bucket,
                    key = %ctx.key,
                    status = err.status_code().as_u16(),
                    error = %err,
                    "object request failed"
                );
                error_to_response(&err)
            }
        }
    }

    async fn try_handle(
        &self,
        ctx: &RequestContext,
    ) -> Result<GatewayResponse, GatewayError> {
        let zone = self
            .with_deadline("zone lookup", self.zones.resolve(&ctx.bucket))
            .await?
            .map_err(GatewayError::ZoneResolution)?;

        let entry = self.provider.encode_entry(&ctx.bucket, &ctx.key);
        let url = zone.retrieval_url(self.config.use_https, &entry);

        if ctx.want_stat {
            debug!(bucket = %ctx.bucket, key = %ctx.key, %url, "serving stat");
            let stat = self
                .with_deadline("stat fetch", self.provider.fetch_stat(&url))
                .await?
                .map_err(GatewayError::Stat)?;
            return stat_response(&stat);
        }

        debug!(bucket = %ctx.bucket, key = %ctx.key, %url, "redirecting");
        redirect_response(&url)
    }

    async fn with_deadline<T>(
        &self,
        what: &'static str,
        fut: impl Future<Output = T>,
    ) -> Result<T, GatewayError> {
        tokio::time::timeout(self.config.request_timeout, fut)
            .await
            .map_err(|_| GatewayError::Timeout(what))
    }
}
