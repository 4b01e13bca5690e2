//! Redirect integration tests.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use reqwest::header::{ACCESS_CONTROL_ALLOW_ORIGIN, LOCATION};

    use crate::{FakeProvider, client, spawn_gateway};

    #[tokio::test]
    async fn test_should_redirect_to_retrieval_url() {
        let gateway = spawn_gateway(FakeProvider::default())
            .await
            .expect("gateway starts");

        let resp = client()
            .get(gateway.url("/b1/k1"))
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            resp.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some("http://example.com/get/YjE6azE=")
        );
        assert_eq!(
            resp.headers()
                .get(ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
        assert!(resp.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_should_redirect_nested_key() {
        let gateway = spawn_gateway(FakeProvider::default())
            .await
            .expect("gateway starts");

        let resp = client()
            .get(gateway.url("/images/photos/2024/cat.png"))
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            resp.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some("http://example.com/get/aW1hZ2VzOnBob3Rvcy8yMDI0L2NhdC5wbmc=")
        );
    }

    #[tokio::test]
    async fn test_should_resolve_zone_once_per_bucket() {
        let gateway = spawn_gateway(FakeProvider::default())
            .await
            .expect("gateway starts");
        let client = client();

        for key in ["a", "b", "c", "d"] {
            let resp = client
                .get(gateway.url(&format!("/b1/{key}")))
                .send()
                .await
                .expect("request");
            assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        }

        assert_eq!(gateway.provider.zone_calls(), 1);
        assert_eq!(gateway.zones.len(), 1);
    }

    #[tokio::test]
    async fn test_should_serve_concurrent_distinct_buckets() {
        let gateway = spawn_gateway(FakeProvider::default())
            .await
            .expect("gateway starts");
        let client = client();

        let requests = (0..16).map(|i| {
            let client = client.clone();
            let url = gateway.url(&format!("/bucket-{i}/key"));
            async move { client.get(url).send().await.expect("request").status() }
        });
        let statuses = futures::future::join_all(requests).await;

        assert!(
            statuses
                .iter()
                .all(|status| *status == StatusCode::TEMPORARY_REDIRECT)
        );
        assert_eq!(gateway.zones.len(), 16);
        for i in 0..16 {
            assert!(gateway.zones.contains(&format!("bucket-{i}")));
        }
    }
}
