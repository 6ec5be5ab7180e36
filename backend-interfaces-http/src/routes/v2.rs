use axum::Router;

use backend_application::AppState;

use crate::handlers::{benford_handlers, ops_handlers, query_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v2/benford/analyze",
            axum::routing::get(benford_handlers::analyze_dataset)
                .post(benford_handlers::analyze_records),
        )
        .route(
            "/v2/benford/chart.png",
            axum::routing::get(benford_handlers::chart_png),
        )
        .route(
            "/v2/query/columns",
            axum::routing::get(query_handlers::list_columns),
        )
        .route(
            "/v2/query/filters",
            axum::routing::get(query_handlers::list_filters),
        )
        .route(
            "/v2/ops/dataset",
            axum::routing::get(ops_handlers::get_dataset),
        )
        .route(
            "/v2/ops/dataset/reload",
            axum::routing::post(ops_handlers::reload_dataset),
        )
        .route(
            "/v2/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v2/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use serde_json::Value;
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    use backend_application::{AppState, DatasetSnapshot, Metrics};
    use backend_domain::{
        CellValue, ChartError, ChartImage, ChartRenderer, Dataset, DatasetRepository, Record,
        RuntimeConfig, DIGIT_BUCKETS,
    };

    use super::build_router;

    const FAKE_PNG: [u8; 4] = [0x89, b'P', b'N', b'G'];

    struct FakeRenderer {
        fail: bool,
    }

    impl ChartRenderer for FakeRenderer {
        fn render_comparison(
            &self,
            _column: &str,
            _expected: &[f64; DIGIT_BUCKETS],
            _observed: &[f64; DIGIT_BUCKETS],
        ) -> Result<ChartImage, ChartError> {
            if self.fail {
                Err(ChartError::Drawing("no fonts".to_string()))
            } else {
                Ok(ChartImage::new(FAKE_PNG.to_vec()))
            }
        }
    }

    struct UnreadableRepository;

    #[async_trait]
    impl DatasetRepository for UnreadableRepository {
        async fn load_dataset(&self, path: &str) -> anyhow::Result<Dataset> {
            Err(anyhow::anyhow!("{} is unreadable", path))
        }
    }

    fn contracts(count: usize) -> Vec<Record> {
        (0..count)
            .map(|i| {
                let buyer = if i % 3 == 0 { "Kenya Power" } else { "Ministry of Health" };
                [
                    ("buyer_name", CellValue::from(buyer)),
                    ("year", CellValue::Number(2020.0 + (i % 2) as f64)),
                    ("total_value_kes", CellValue::Number((i as f64 + 1.0) * 113.0)),
                ]
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect()
            })
            .collect()
    }

    fn state_with(api_token: Option<&str>, fail_chart: bool) -> AppState {
        let config = RuntimeConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            api_token: api_token.map(str::to_string),
            dataset_path: "./records.json".to_string(),
            default_column: "total_value_kes".to_string(),
            min_sample_size: 30,
            deviation_threshold_pct: 15.0,
            sample_rows: 10,
            chart_width: 600,
            chart_height: 400,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 5,
        };
        AppState {
            config,
            dataset: Arc::new(RwLock::new(DatasetSnapshot::new(
                Dataset::from_records(contracts(90)),
                "memory",
            ))),
            dataset_repo: Arc::new(UnreadableRepository),
            chart_renderer: Arc::new(FakeRenderer { fail: fail_chart }),
            metrics: Arc::new(Metrics::default()),
        }
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = build_router(state)
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, body.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn json(body: &[u8]) -> Value {
        serde_json::from_slice(body).expect("json body")
    }

    #[tokio::test]
    async fn analyze_returns_report_and_chart() {
        let (status, body) = send(state_with(None, false), get("/v2/benford/analyze")).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["report"]["column"], "total_value_kes");
        assert_eq!(body["report"]["observations"], 90);
        assert_eq!(body["report"]["digits"].as_array().map(Vec::len), Some(9));
        assert_eq!(body["chart_data_uri"], "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn analyze_applies_filters() {
        let (status, body) = send(
            state_with(None, false),
            get("/v2/benford/analyze?buyer=Ministry%20of%20Health&year="),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["report"]["observations"], 60);

        let (status, body) = send(
            state_with(None, false),
            get("/v2/benford/analyze?buyer=Kenya%20Power&year=2020"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["status"], "insufficient_data");
        assert_eq!(
            body["message"],
            "Too few samples in 'total_value_kes' (15 valid entries, need at least 30)."
        );
    }

    #[tokio::test]
    async fn unknown_column_is_a_warning_response() {
        let (status, body) = send(
            state_with(None, false),
            get("/v2/benford/analyze?column=award_value"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["status"], "column_not_found");
        assert_eq!(body["message"], "Column 'award_value' not found.");
        assert!(body.get("report").is_none());
    }

    #[tokio::test]
    async fn posted_gzip_records_are_analyzed() {
        let records: Vec<Value> = (1..=40)
            .map(|i| serde_json::json!({ "amount": i * 29 }))
            .collect();
        let payload = serde_json::json!({ "column": "amount", "records": records });
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(payload.to_string().as_bytes())
            .expect("compress");
        let body = encoder.finish().expect("finish");

        let request = Request::builder()
            .method(Method::POST)
            .uri("/v2/benford/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_ENCODING, "gzip")
            .body(Body::from(body))
            .expect("request");
        let (status, body) = send(state_with(None, false), request).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["report"]["observations"], 40);
    }

    #[tokio::test]
    async fn malformed_post_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v2/benford/analyze")
            .body(Body::from("{\"records\": \"nope\"}"))
            .expect("request");
        let (status, body) = send(state_with(None, false), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json(&body)["error"]
            .as_str()
            .is_some_and(|msg| msg.starts_with("bad request")));
    }

    #[tokio::test]
    async fn chart_png_serves_image_bytes() {
        let response = build_router(state_with(None, false))
            .oneshot(get("/v2/benford/chart.png"))
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some("image/png".as_bytes())
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        assert_eq!(body.as_ref(), FAKE_PNG.as_slice());
    }

    #[tokio::test]
    async fn chart_png_reports_render_failure() {
        let (status, body) = send(state_with(None, true), get("/v2/benford/chart.png")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(json(&body)["error"]
            .as_str()
            .is_some_and(|msg| msg.contains("no fonts")));

        let (status, body) = send(state_with(None, true), get("/v2/benford/analyze")).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["status"], "ok");
        assert!(body.get("chart_data_uri").is_none());
        assert!(body["report"]["chart_error"]
            .as_str()
            .is_some_and(|msg| msg.contains("no fonts")));
    }

    #[tokio::test]
    async fn token_is_required_when_configured() {
        let (status, _) = send(state_with(Some("secret"), false), get("/v2/query/columns")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri("/v2/query/columns")
            .header(header::AUTHORIZATION, "Bearer secret")
            .body(Body::empty())
            .expect("request");
        let (status, body) = send(state_with(Some("secret"), false), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), serde_json::json!(["total_value_kes", "year"]));

        let (status, _) = send(state_with(Some("secret"), false), get("/v2/ops/health/live")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn filter_options_list_buyers_and_years() {
        let (status, body) = send(state_with(None, false), get("/v2/query/filters")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json(&body),
            serde_json::json!({
                "buyers": ["Kenya Power", "Ministry of Health"],
                "years": [2020, 2021]
            })
        );
    }

    #[tokio::test]
    async fn failed_reload_is_service_unavailable() {
        let state = state_with(None, false);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v2/ops/dataset/reload")
            .body(Body::empty())
            .expect("request");
        let (status, _) = send(state.clone(), request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, body) = send(state, get("/v2/ops/dataset")).await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["rows"], 90);
        assert_eq!(body["source"], "memory");
    }

    #[tokio::test]
    async fn metrics_count_analyses() {
        let state = state_with(None, false);
        let (status, _) = send(state.clone(), get("/v2/benford/analyze")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(state, get("/v2/ops/metrics/prometheus")).await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).expect("utf-8");
        assert!(text.contains("tenderscope_benford_analyses_total 1\n"));
    }
}
