//! End-to-end tests for the s3qiniu gateway.
//!
//! Each test starts the gateway in-process on an ephemeral port, backed by
//! [`FakeProvider`] instead of the Qiniu backend, and talks to it over real
//! HTTP with `reqwest`. No external services are needed.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use s3qiniu_core::{MetadataProvider, ProviderError, StatResult, ZoneCache, ZoneRecord};
use s3qiniu_http::{GatewayHandler, GatewayHttpService, HandlerConfig};
use tokio::net::TcpListener;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// In-memory stand-in for the Qiniu backend.
///
/// Every bucket lives on the `example.com` zone, except the buckets listed in
/// `missing`, which fail with the backend's "no such bucket" message.
#[derive(Debug, Default)]
pub struct FakeProvider {
    zone_calls: AtomicUsize,
    missing: HashSet<String>,
}

impl FakeProvider {
    /// Provider for which `buckets` do not exist.
    #[must_use]
    pub fn with_missing(buckets: &[&str]) -> Self {
        Self {
            zone_calls: AtomicUsize::new(0),
            missing: buckets.iter().map(|b| (*b).to_owned()).collect(),
        }
    }

    /// Number of zone lookups that reached the provider.
    #[must_use]
    pub fn zone_calls(&self) -> usize {
        self.zone_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for FakeProvider {
    async fn resolve_zone(&self, bucket: &str) -> Result<ZoneRecord, ProviderError> {
        self.zone_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        if self.missing.contains(bucket) {
            return Err(ProviderError::Remote {
                status: 631,
                message: "no such bucket".to_owned(),
            });
        }
        Ok(ZoneRecord::new("example.com", "https://example.com").with_region("z0"))
    }

    async fn fetch_stat(&self, url: &str) -> Result<StatResult, ProviderError> {
        Ok(StatResult {
            url: url.to_owned(),
            size: 42,
            hash: Some("FhQzFvPZ8M6m8m8v".to_owned()),
            mime_type: Some("image/png".to_owned()),
            ..StatResult::default()
        })
    }

    fn encode_entry(&self, bucket: &str, key: &str) -> String {
        s3qiniu_provider::encoded_entry(bucket, key)
    }
}

/// A gateway running on a local ephemeral port.
#[derive(Debug)]
pub struct TestGateway {
    /// Bound address.
    pub addr: SocketAddr,
    /// The backend the gateway talks to.
    pub provider: Arc<FakeProvider>,
    /// The gateway's zone cache.
    pub zones: Arc<ZoneCache>,
}

impl TestGateway {
    /// Absolute URL for `path_and_query` on this gateway.
    #[must_use]
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{path_and_query}", self.addr)
    }
}

/// Start a gateway backed by `provider`. The server task lives until the test runtime stops.
pub async fn spawn_gateway(provider: FakeProvider) -> anyhow::Result<TestGateway> {
    init_tracing();

    let provider = Arc::new(provider);
    let dyn_provider: Arc<dyn MetadataProvider> = Arc::clone(&provider) as _;
    let zones = Arc::new(ZoneCache::new(Arc::clone(&dyn_provider)));
    let handler = GatewayHandler::new(
        Arc::clone(&zones),
        dyn_provider,
        HandlerConfig::default(),
    );
    let service = GatewayHttpService::new(handler);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let http = HttpConnBuilder::new(TokioExecutor::new());
        while let Ok((stream, _)) = listener.accept().await {
            let conn = http
                .serve_connection(TokioIo::new(stream), service.clone())
                .into_owned();
            tokio::spawn(async move {
                let _ = conn.await;
            });
        }
    });

    Ok(TestGateway {
        addr,
        provider,
        zones,
    })
}

/// HTTP client that reports redirects instead of following them.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("static client configuration should be valid")
}

mod test_errors;
mod test_redirect;
mod test_stat;
