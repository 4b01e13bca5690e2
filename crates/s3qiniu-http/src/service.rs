//! The gateway HTTP service implementing hyper's `Service` trait.
//!
//! [`GatewayHttpService`] handles, in order:
//!
//! 1. Health check interception (`GET /health`, `GET /_health`)
//! 2. Routing of `/{bucket}/{key}` via [`route`]
//! 3. Object handling via [`GatewayHandler`]
//! 4. Common response headers (`x-request-id`, `Server`)
//!
//! Request bodies are never read.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::handler::GatewayHandler;
use crate::response::{GatewayResponse, error_to_response, health_check_response};
use crate::router::{Route, route};

/// Value of the `Server` response header.
const SERVER_NAME: &str = "s3qiniu";

/// The gateway HTTP service. Cheap to clone: one clone per connection.
#[derive(Debug, Clone)]
pub struct GatewayHttpService {
    handler: Arc<GatewayHandler>,
}

impl GatewayHttpService {
    /// Create a new service around `handler`.
    #[must_use]
    pub fn new(handler: GatewayHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// The request handler.
    #[must_use]
    pub fn handler(&self) -> &GatewayHandler {
        &self.handler
    }
}

impl Service<http::Request<Incoming>> for GatewayHttpService {
    type Response = GatewayResponse;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let (parts, _body) = req.into_parts();
        let req = http::Request::from_parts(parts, ());

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let response = process_request(&req, &handler, &request_id).await;
            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Process a request through the gateway pipeline.
pub async fn process_request<B>(
    req: &http::Request<B>,
    handler: &GatewayHandler,
    request_id: &str,
) -> GatewayResponse {
    let method = req.method();
    let uri = req.uri();
    debug!(%method, %uri, request_id, "processing request");

    let ctx = match route(req) {
        Ok(Route::Health) => return health_check_response(),
        Ok(Route::Object(ctx)) => ctx,
        Err(err) => {
            warn!(%method, %uri, error = %err, request_id, "failed to route request");
            return error_to_response(&err);
        }
    };

    info!(
        bucket = %ctx.bucket,
        key = %ctx.key,
        stat = ctx.want_stat,
        request_id,
        "routed object request"
    );

    handler.handle(&ctx).await
}

/// Add common response headers to every response.
fn add_common_headers(mut response: GatewayResponse, request_id: &str) -> GatewayResponse {
    let headers = response.headers_mut();

    if let Ok(hv) = http::header::HeaderValue::from_str(request_id) {
        headers.insert("x-request-id", hv);
    }
    headers.insert(
        http::header::SERVER,
        http::header::HeaderValue::from_static(SERVER_NAME),
    );

    response
}
