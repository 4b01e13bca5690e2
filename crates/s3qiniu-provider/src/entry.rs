//! Entry encoding: how Qiniu addresses an object inside management URLs.
//!
//! An entry is `bucket:key` (or just `bucket` for an empty key), encoded with
//! the URL-safe base64 alphabet, padding kept.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;

/// Encode `(bucket, key)` into a URL path segment.
///
/// # Examples
///
/// ```
/// use s3qiniu_provider::encoded_entry;
///
/// assert_eq!(encoded_entry("b1", "k1"), "YjE6azE=");
/// ```
#[must_use]
pub fn encoded_entry(bucket: &str, key: &str) -> String {
    if key.is_empty() {
        URL_SAFE.encode(bucket)
    } else {
        URL_SAFE.encode(format!("{bucket}:{key}"))
    }
}
