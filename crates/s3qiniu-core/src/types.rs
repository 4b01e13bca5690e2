//! Domain types exchanged between the handler, the zone cache and the provider.

use serde::{Deserialize, Serialize};

/// Zone descriptor of a bucket: where its metadata service lives.
///
/// Immutable once resolved. The hosts may be bare (`rs-z0.qiniuapi.com`) or
/// carry a scheme (`https://rs-z0.qiniuapi.com`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRecord {
    /// Region identifier reported by the backend, if any (e.g. `z0`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Retrieval host used for plain HTTP.
    pub http_host: String,
    /// Retrieval host used for HTTPS.
    pub https_host: String,
}

impl ZoneRecord {
    /// Create a zone record from its HTTP and HTTPS retrieval hosts.
    #[must_use]
    pub fn new(http_host: impl Into<String>, https_host: impl Into<String>) -> Self {
        Self {
            region: None,
            http_host: http_host.into(),
            https_host: https_host.into(),
        }
    }

    /// Attach a region identifier.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Retrieval host with a scheme, defaulting to `http://` when the selected
    /// variant carries none.
    ///
    /// # Examples
    ///
    /// ```
    /// use s3qiniu_core::ZoneRecord;
    ///
    /// let zone = ZoneRecord::new("example.com", "https://example.com");
    /// assert_eq!(zone.retrieval_host(false), "http://example.com");
    /// assert_eq!(zone.retrieval_host(true), "https://example.com");
    /// ```
    #[must_use]
    pub fn retrieval_host(&self, use_https: bool) -> String {
        let host = if use_https {
            &self.https_host
        } else {
            &self.http_host
        };
        let host = host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_owned()
        } else {
            format!("http://{host}")
        }
    }

    /// Canonical retrieval URL of an encoded entry on this zone.
    #[must_use]
    pub fn retrieval_url(&self, use_https: bool, encoded_entry: &str) -> String {
        format!("{}/get/{encoded_entry}", self.retrieval_host(use_https))
    }
}

/// Object metadata returned in stat mode.
///
/// Known fields are typed; everything else the backend reports is kept in
/// `extra` and serialized back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatResult {
    /// Download URL of the object.
    #[serde(default)]
    pub url: String,
    /// Object size in bytes.
    #[serde(default, alias = "fsize")]
    pub size: i64,
    /// Content hash (Qiniu etag).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Content type.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "mimeType")]
    pub mime_type: Option<String>,
    /// Upload time in 100ns units since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "putTime")]
    pub put_time: Option<i64>,
    /// Expiry of `url`, Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    /// Remaining provider fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Per-request view of an object access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Bucket name from the first path segment.
    pub bucket: String,
    /// Object key: the rest of the path.
    pub key: String,
    /// `true` when the query carries `stat=true`.
    pub want_stat: bool,
}
