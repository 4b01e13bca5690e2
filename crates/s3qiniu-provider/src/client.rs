//! HTTP client for the Qiniu UC (zone query, bucket list) and RS (stat) services.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use s3qiniu_core::{MetadataProvider, ProviderError, StatResult, ZoneRecord};

use crate::credentials::QiniuMac;
use crate::entry::encoded_entry;

/// Qiniu-backed [`MetadataProvider`].
#[derive(Debug, Clone)]
pub struct QiniuProvider {
    client: Client,
    mac: QiniuMac,
    uc_host: String,
}

impl QiniuProvider {
    /// Create a provider talking to the UC service at `uc_host`.
    ///
    /// `timeout` bounds every HTTP exchange with the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        mac: QiniuMac,
        uc_host: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("s3qiniu/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            mac,
            uc_host: uc_host.into().trim_end_matches('/').to_owned(),
        })
    }

    /// URL of the v4 zone query for `bucket`.
    fn zone_query_url(&self, bucket: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("ak", self.mac.access_key())
            .append_pair("bucket", bucket)
            .finish();
        format!("{}/v4/query?{query}", self.uc_host)
    }

    /// Send a QBox-signed GET and decode the JSON answer.
    async fn signed_get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let url = Url::parse(url)
            .map_err(|e| ProviderError::Transport(format!("invalid url {url}: {e}")))?;
        let authorization = self.mac.authorization(&url);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        decode_response(response).await
    }
}

#[async_trait]
impl MetadataProvider for QiniuProvider {
    async fn resolve_zone(&self, bucket: &str) -> Result<ZoneRecord, ProviderError> {
        let url = self.zone_query_url(bucket);
        debug!(bucket, %url, "querying bucket zone");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let query: ZoneQueryResponse = decode_response(response).await?;
        zone_from_query(bucket, query)
    }

    async fn fetch_stat(&self, url: &str) -> Result<StatResult, ProviderError> {
        debug!(%url, "fetching object stat");
        self.signed_get(url).await
    }

    fn encode_entry(&self, bucket: &str, key: &str) -> String {
        encoded_entry(bucket, key)
    }

    async fn check_credentials(&self) -> Result<(), ProviderError> {
        let url = format!("{}/buckets", self.uc_host);
        let buckets: Vec<String> = self.signed_get(&url).await?;
        debug!(buckets = buckets.len(), "credentials accepted");
        Ok(())
    }
}

/// Answer of `GET /v4/query`.
#[derive(Debug, Deserialize)]
struct ZoneQueryResponse {
    #[serde(default)]
    hosts: Vec<ZoneHosts>,
}

/// One host group of a zone query answer.
#[derive(Debug, Deserialize)]
struct ZoneHosts {
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    rs: Option<ServiceDomains>,
}

#[derive(Debug, Deserialize)]
struct ServiceDomains {
    #[serde(default)]
    domains: Vec<String>,
}

/// Error body returned by Qiniu services.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Pick the retrieval host of the first host group that has one.
fn zone_from_query(bucket: &str, query: ZoneQueryResponse) -> Result<ZoneRecord, ProviderError> {
    query
        .hosts
        .into_iter()
        .find_map(|hosts| {
            let domain = hosts.rs?.domains.into_iter().find(|d| !d.is_empty())?;
            let domain = domain
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .to_owned();
            let zone = ZoneRecord::new(domain.clone(), format!("https://{domain}"));
            Some(match hosts.region {
                Some(region) => zone.with_region(region),
                None => zone,
            })
        })
        .ok_or_else(|| ProviderError::NoZone(bucket.to_owned()))
}

/// Turn a non-success answer into [`ProviderError::Remote`].
fn remote_error(status: u16, body: &[u8]) -> ProviderError {
    let message = serde_json::from_slice::<ErrorBody>(body).map_or_else(
        |_| String::from_utf8_lossy(body).trim().to_owned(),
        |e| e.error,
    );
    let message = if message.is_empty() {
        format!("unexpected status {status}")
    } else {
        message
    };
    ProviderError::Remote { status, message }
}

async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| ProviderError::Transport(e.to_string()))?;

    if !status.is_success() {
        let err = remote_error(status.as_u16(), &body);
        warn!(status = status.as_u16(), error = %err, "qiniu request failed");
        return Err(err);
    }

    serde_json::from_slice(&body).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}
