//! Core building blocks of the s3qiniu gateway.
//!
//! This crate holds everything the HTTP layer needs that is not HTTP itself:
//! the gateway configuration, the error taxonomy, the domain types exchanged
//! with the backend, the [`MetadataProvider`] contract, and the process-wide
//! [`ZoneCache`] mapping bucket names to their zone.
//!
//! # Architecture
//!
//! ```text
//! GatewayHandler (s3qiniu-http)
//!        |
//!        v
//!   ZoneCache  --miss-->  MetadataProvider::resolve_zone
//!        |
//!        v
//!   ZoneRecord -> retrieval URL -> redirect / MetadataProvider::fetch_stat
//! ```

pub mod config;
pub mod error;
pub mod provider;
pub mod types;
pub mod zone_cache;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult, ProviderError};
pub use provider::MetadataProvider;
pub use types::{RequestContext, StatResult, ZoneRecord};
pub use zone_cache::ZoneCache;
