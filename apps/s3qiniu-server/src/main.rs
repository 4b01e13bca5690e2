//! s3qiniu server - S3-style object gateway in front of Qiniu Kodo.
//!
//! Serves `/{bucket}/{key}` by redirecting (`307`) to the object's retrieval
//! URL on the bucket's zone, or by returning the object's metadata as JSON
//! when the query carries `stat=true`. Bucket zones are resolved once and
//! cached for the lifetime of the process.
//!
//! # Usage
//!
//! ```text
//! S3QINIU_ACCESS_KEY=... S3QINIU_SECRET_KEY=... s3qiniu-server --addr 0.0.0.0:8082
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `S3QINIU_LISTEN` | `0.0.0.0:8082` | Bind address |
//! | `S3QINIU_ACCESS_KEY` | *(required)* | Qiniu access key |
//! | `S3QINIU_SECRET_KEY` | *(required)* | Qiniu secret key |
//! | `S3QINIU_BUCKET` | *(unset)* | Default bucket (required without wild mode) |
//! | `S3QINIU_WILD_MODE` | `true` | Allow any bucket |
//! | `S3QINIU_USE_HTTPS` | `false` | Redirect to HTTPS retrieval hosts |
//! | `S3QINIU_REQUEST_TIMEOUT_SECS` | `30` | Deadline per backend call |
//! | `S3QINIU_UC_HOST` | `https://uc.qbox.me` | Zone query endpoint |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod cli;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use s3qiniu_core::{GatewayConfig, MetadataProvider, ZoneCache};
use s3qiniu_http::{GatewayHandler, GatewayHttpService, HandlerConfig};
use s3qiniu_provider::{QiniuMac, QiniuProvider};

use crate::cli::Cli;

/// Server version logged at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `log_level` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the Qiniu provider and check its credentials against the backend.
async fn build_provider(config: &GatewayConfig) -> Result<Arc<dyn MetadataProvider>> {
    let mac = QiniuMac::new(config.access_key.clone(), config.secret_key.clone());
    let provider = QiniuProvider::new(mac, config.uc_host.clone(), config.request_timeout())
        .context("failed to build qiniu client")?;

    provider
        .check_credentials()
        .await
        .map_err(|e| anyhow::anyhow!("init qiniu ends with error: {e}"))?;

    let provider: Arc<dyn MetadataProvider> = Arc::new(provider);
    Ok(provider)
}

/// Accept connections until Ctrl-C, then wait for in-flight requests to finish.
async fn serve(listener: TcpListener, service: GatewayHttpService) -> Result<()> {
    let http = HttpConnBuilder::new(TokioExecutor::new());
    let graceful = GracefulShutdown::new();
    let mut shutdown = std::pin::pin!(shutdown_signal());

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            },
            () = &mut shutdown => break,
        };

        let conn = http
            .serve_connection(TokioIo::new(stream), service.clone())
            .into_owned();
        let conn = graceful.watch(conn);
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!(%peer, error = %e, "connection closed with error");
            }
        });
    }

    info!("shutdown requested, draining in-flight requests");
    graceful.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c, shutting down");
    }
}

/// Ask a running gateway for `/health` and require `"status": "running"`.
async fn run_health_check(addr: &str) -> Result<()> {
    let url = format!("http://{addr}/health");
    let client = reqwest::Client::builder()
        .timeout(HEALTH_CHECK_TIMEOUT)
        .build()
        .context("failed to build health check client")?;

    let resp = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("cannot reach {url}"))?;
    anyhow::ensure!(resp.status().is_success(), "{url} answered {}", resp.status());

    let body: serde_json::Value = resp.json().await.context("health body is not json")?;
    anyhow::ensure!(body["status"] == "running", "gateway reports {body}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.health_check {
        let addr = cli.addr.replace("0.0.0.0", "127.0.0.1");
        if let Err(e) = run_health_check(&addr).await {
            eprintln!("unhealthy: {e:#}");
            std::process::exit(1);
        }
        return Ok(());
    }

    let config = cli.into_config();

    init_tracing(&config.log_level)?;

    config.validate().context("invalid configuration")?;

    info!(
        listen = %config.listen,
        uc_host = %config.uc_host,
        use_https = config.use_https,
        request_timeout_secs = config.request_timeout_secs,
        version = VERSION,
        "starting s3qiniu server",
    );
    info!(
        default_bucket = ?config.default_bucket,
        wild_mode = config.wild_mode,
        enable_page = config.enable_page,
        "reserved bucket options (no effect on request handling)",
    );

    let provider = build_provider(&config).await?;
    let zones = Arc::new(ZoneCache::new(Arc::clone(&provider)));
    let handler = GatewayHandler::new(zones, provider, HandlerConfig::from(&config));
    let service = GatewayHttpService::new(handler);

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}
