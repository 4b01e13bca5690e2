//! The backend contract consumed by the zone cache and the request handler.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{StatResult, ZoneRecord};

/// Remote metadata service backing the gateway.
///
/// Authentication of the calls is the implementor's concern. Implementations
/// must be shareable across request tasks, so the gateway holds them as
/// `Arc<dyn MetadataProvider>`.
#[async_trait]
pub trait MetadataProvider: Send + Sync + 'static {
    /// Look up the zone serving `bucket`.
    async fn resolve_zone(&self, bucket: &str) -> Result<ZoneRecord, ProviderError>;

    /// Fetch object metadata from a retrieval URL built by the gateway.
    async fn fetch_stat(&self, url: &str) -> Result<StatResult, ProviderError>;

    /// Encode a `(bucket, key)` pair into the path segment used in retrieval URLs.
    fn encode_entry(&self, bucket: &str, key: &str) -> String;

    /// Verify that the configured credentials are accepted by the backend.
    async fn check_credentials(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
