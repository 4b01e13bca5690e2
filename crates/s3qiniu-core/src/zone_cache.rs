//! Read-through bucket → zone cache.
//!
//! [`ZoneCache`] memoizes [`MetadataProvider::resolve_zone`] per bucket for the
//! lifetime of the process. Entries never expire and are never replaced.
//!
//! Lookups take a shared lock only. On a miss the lock is released before the
//! provider is called, so a slow lookup never blocks readers of other buckets.
//! Two concurrent misses for the same bucket may both reach the provider; the
//! first record written wins and every caller gets that record back. Failed
//! lookups leave no trace, so the next request retries the provider.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::ProviderError;
use crate::provider::MetadataProvider;
use crate::types::ZoneRecord;

/// Thread-safe, process-wide map from bucket name to its [`ZoneRecord`].
pub struct ZoneCache {
    zones: RwLock<HashMap<String, Arc<ZoneRecord>>>,
    provider: Arc<dyn MetadataProvider>,
}

impl std::fmt::Debug for ZoneCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneCache")
            .field("zones", &self.zones.read().len())
            .finish_non_exhaustive()
    }
}

impl ZoneCache {
    /// Create an empty cache backed by `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            zones: RwLock::new(HashMap::new()),
            provider,
        }
    }

    /// Return the zone of `bucket`, querying the provider on first access.
    ///
    /// # Errors
    ///
    /// Returns the provider's error unchanged when the lookup fails, and
    /// [`ProviderError::NoZone`] for an empty bucket name. Nothing is cached
    /// in either case.
    pub async fn resolve(&self, bucket: &str) -> Result<Arc<ZoneRecord>, ProviderError> {
        if bucket.is_empty() {
            return Err(ProviderError::NoZone(String::new()));
        }

        if let Some(zone) = self.peek(bucket) {
            debug!(bucket, "zone cache hit");
            return Ok(zone);
        }

        debug!(bucket, "zone cache miss, querying provider");
        let resolved = self.provider.resolve_zone(bucket).await?;

        let (zone, inserted) = self.store(bucket, resolved);
        if inserted {
            info!(
                bucket,
                region = ?zone.region,
                http_host = %zone.http_host,
                "cached bucket zone"
            );
        } else {
            debug!(bucket, "zone cached concurrently, keeping first record");
        }
        Ok(zone)
    }

    /// Insert `resolved` unless `bucket` already has a record. Returns the
    /// stored record and whether this call inserted it.
    fn store(&self, bucket: &str, resolved: ZoneRecord) -> (Arc<ZoneRecord>, bool) {
        match self.zones.write().entry(bucket.to_owned()) {
            Entry::Occupied(existing) => (Arc::clone(existing.get()), false),
            Entry::Vacant(slot) => (Arc::clone(slot.insert(Arc::new(resolved))), true),
        }
    }

    /// Return the cached zone of `bucket` without contacting the provider.
    #[must_use]
    pub fn peek(&self, bucket: &str) -> Option<Arc<ZoneRecord>> {
        self.zones.read().get(bucket).cloned()
    }

    /// Whether `bucket` has a cached zone.
    #[must_use]
    pub fn contains(&self, bucket: &str) -> bool {
        self.zones.read().contains_key(bucket)
    }

    /// Number of cached buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.read().len()
    }

    /// Whether no bucket has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.read().is_empty()
    }

    /// The provider this cache reads through to.
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn MetadataProvider> {
        &self.provider
    }
}
