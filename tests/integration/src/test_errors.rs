//! Error path integration tests.

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use crate::{FakeProvider, client, spawn_gateway};

    #[tokio::test]
    async fn test_should_pass_backend_error_through_as_bad_gateway() {
        let gateway = spawn_gateway(FakeProvider::with_missing(&["ghost"]))
            .await
            .expect("gateway starts");
        let client = client();

        for _ in 0..2 {
            let resp = client
                .get(gateway.url("/ghost/k1"))
                .send()
                .await
                .expect("request");
            assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
            assert_eq!(resp.text().await.expect("body"), "no such bucket");
        }

        assert!(!gateway.zones.contains("ghost"));
        assert_eq!(gateway.provider.zone_calls(), 2);
    }

    #[tokio::test]
    async fn test_should_return_not_found_without_key() {
        let gateway = spawn_gateway(FakeProvider::default())
            .await
            .expect("gateway starts");

        for path in ["/", "/b1", "/b1/"] {
            let resp = client()
                .get(gateway.url(path))
                .send()
                .await
                .expect("request");
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
        }
        assert_eq!(gateway.provider.zone_calls(), 0);
    }

    #[tokio::test]
    async fn test_should_answer_health_check() {
        let gateway = spawn_gateway(FakeProvider::default())
            .await
            .expect("gateway starts");

        let resp = client()
            .get(gateway.url("/health"))
            .send()
            .await
            .expect("request");

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = resp.json().await.expect("json body");
        assert_eq!(body["status"], "running");
        assert_eq!(body["service"], "s3qiniu");
    }
}
