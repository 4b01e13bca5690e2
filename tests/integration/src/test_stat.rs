//! Stat mode integration tests.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use reqwest::header::CONTENT_TYPE;

    use crate::{FakeProvider, client, spawn_gateway};

    #[tokio::test]
    async fn test_should_return_stat_json() {
        let gateway = spawn_gateway(FakeProvider::default())
            .await
            .expect("gateway starts");

        let resp = client()
            .get(gateway.url("/b1/k1?stat=true"))
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );

        let body: serde_json::Value = resp.json().await.expect("json body");
        assert_eq!(body["size"], 42);
        assert_eq!(body["mimeType"], "image/png");
        assert_eq!(body["url"], "http://example.com/get/YjE6azE=");
    }

    #[tokio::test]
    async fn test_should_redirect_when_stat_is_not_true() {
        let gateway = spawn_gateway(FakeProvider::default())
            .await
            .expect("gateway starts");

        let resp = client()
            .get(gateway.url("/b1/k1?stat=false"))
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    }
}
