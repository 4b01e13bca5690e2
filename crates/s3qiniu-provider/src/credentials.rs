//! Qiniu credentials and QBox request signing.
//!
//! Management requests carry `Authorization: QBox <token>` where:
//!
//! ```text
//! token         = AccessKey + ":" + UrlSafeBase64(HMAC-SHA1(SecretKey, StringToSign))
//! StringToSign  = Path + ["?" + RawQuery] + "\n"
//! ```

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use hmac::{Hmac, KeyInit, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Access/secret key pair used to sign requests to Qiniu.
#[derive(Clone)]
pub struct QiniuMac {
    access_key: String,
    secret_key: String,
}

impl std::fmt::Debug for QiniuMac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QiniuMac")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .finish()
    }
}

impl QiniuMac {
    /// Create a signer from an access key and a secret key.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// The access key.
    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Sign arbitrary data: `AccessKey:UrlSafeBase64(HMAC-SHA1(SecretKey, data))`.
    #[must_use]
    pub fn sign(&self, data: &[u8]) -> String {
        let mut mac = HmacSha1::new_from_slice(self.secret_key.as_bytes())
            .expect("HMAC can accept any key length");
        mac.update(data);
        let digest = mac.finalize().into_bytes();
        format!("{}:{}", self.access_key, URL_SAFE.encode(digest))
    }

    /// QBox token of a request with the given path and optional raw query.
    #[must_use]
    pub fn sign_request(&self, path: &str, query: Option<&str>) -> String {
        let mut data = String::with_capacity(path.len() + 1);
        data.push_str(path);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            data.push('?');
            data.push_str(query);
        }
        data.push('\n');
        self.sign(data.as_bytes())
    }

    /// Value of the `Authorization` header for a request to `url`.
    #[must_use]
    pub fn authorization(&self, url: &reqwest::Url) -> String {
        format!("QBox {}", self.sign_request(url.path(), url.query()))
    }
}
