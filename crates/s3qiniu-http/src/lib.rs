//! HTTP layer of the s3qiniu gateway.
//!
//! - **Routing** ([`router`]): maps `/{bucket}/{key}` requests and health probes
//!   to a [`Route`](router::Route).
//! - **Handling** ([`handler`]): resolves the bucket zone, builds the retrieval
//!   URL, and redirects or returns stat JSON.
//! - **Responses** ([`response`]): redirect, JSON and plain-text error responses.
//! - **Service** ([`service`]): [`GatewayHttpService`](service::GatewayHttpService),
//!   the hyper `Service` tying routing and handling together.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> GatewayHttpService (hyper Service)
//!     -> Health check interception
//!     -> route (/{bucket}/{key}, ?stat=true)
//!     -> GatewayHandler
//!        -> ZoneCache::resolve (read-through to the provider)
//!        -> 307 redirect | provider stat -> 200 JSON | 502/504 plain text
//!     -> Common response headers (x-request-id, Server)
//!   <- HTTP Response
//! ```

pub mod handler;
pub mod response;
pub mod router;
pub mod service;

pub use handler::{GatewayHandler, HandlerConfig};
pub use response::GatewayResponse;
pub use router::{Route, route};
pub use service::GatewayHttpService;
