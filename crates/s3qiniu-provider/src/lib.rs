//! Qiniu Kodo implementation of the s3qiniu [`MetadataProvider`].
//!
//! # Modules
//!
//! - [`credentials`] - Access/secret key pair and QBox request signing
//! - [`entry`] - Encoding of `(bucket, key)` pairs into URL path segments
//! - [`client`] - [`QiniuProvider`], the HTTP client talking to the UC and RS services
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use s3qiniu_provider::{QiniuMac, QiniuProvider};
//!
//! let mac = QiniuMac::new("access-key", "secret-key");
//! let provider = QiniuProvider::new(mac, "https://uc.qbox.me", Duration::from_secs(30))
//!     .expect("http client");
//! ```
//!
//! [`MetadataProvider`]: s3qiniu_core::MetadataProvider

pub mod client;
pub mod credentials;
pub mod entry;

pub use client::QiniuProvider;
pub use credentials::QiniuMac;
pub use entry::encoded_entry;
