use async_trait::async_trait;
use order_check::server::{build_router, AppState};
use order_check::services::{InMemoryOrderStore, VisionAnalyzer};
use order_check::{AppResult, Config, Order, QuantityMapping, ReconcileFlow, ReconcileReport};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::net::TcpListener;

/// 固定返回同一段文本的视觉模型
struct ScriptedVision(&'static str);

#[async_trait]
impl VisionAnalyzer for ScriptedVision {
    async fn analyze(&self, image: &[u8], _mime_type: &str) -> AppResult<String> {
        assert!(!image.is_empty());
        Ok(self.0.to_string())
    }
}

/// 启动测试服务，返回基础 URL
async fn spawn_server(vision_text: &'static str, config: Config) -> String {
    let _ = tracing_subscriber::fmt::try_init();

    let store = Arc::new(InMemoryOrderStore::new(Order::demo_orders()));
    let flow = Arc::new(ReconcileFlow::new(
        &config,
        Arc::new(ScriptedVision(vision_text)),
        store,
    ));
    let router = build_router(AppState {
        flow,
        max_image_bytes: config.max_image_bytes,
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

fn jpeg_part() -> Part {
    Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
        .file_name("capture.jpg")
        .mime_str("image/jpeg")
        .unwrap()
}

#[tokio::test]
async fn test_upload_reports_missing_and_extra() {
    let base = spawn_server("- 1 Coke\n• Soda x2\nChips", Config::default()).await;

    let form = Form::new().text("order_id", "101").part("image", jpeg_part());
    let response = reqwest::Client::new()
        .post(format!("{base}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let report: ReconcileReport = response.json().await.unwrap();
    assert_eq!(report.order_id, 101);
    assert_eq!(report.missing_items, QuantityMapping::from([("Coke", 1)]));
    assert_eq!(report.extra_items, QuantityMapping::from([("Soda", 2)]));
    assert_eq!(report.total_recognized_items, 4);
    assert!(!report.is_complete);
}

#[tokio::test]
async fn test_upload_accepts_legacy_file_field() {
    let base = spawn_server("2 Coke\nChips (1)", Config::default()).await;

    let form = Form::new().text("order_id", "101").part("file", jpeg_part());
    let response = reqwest::Client::new()
        .post(format!("{base}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["is_complete"], true);
    assert_eq!(body["missing_items"], serde_json::json!({}));
    assert_eq!(body["extra_items"], serde_json::json!({}));
}

#[tokio::test]
async fn test_upload_request_errors() {
    let base = spawn_server("2 Coke", Config::default()).await;
    let client = reqwest::Client::new();

    // 缺少 order_id
    let form = Form::new().part("image", jpeg_part());
    let response = client
        .post(format!("{base}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("order_id"));

    // 缺少图片
    let form = Form::new().text("order_id", "101");
    let response = client
        .post(format!("{base}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // 订单不存在
    let form = Form::new().text("order_id", "999").part("image", jpeg_part());
    let response = client
        .post(format!("{base}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_rejects_oversized_image() {
    let config = Config {
        max_image_bytes: 2,
        ..Config::default()
    };
    let base = spawn_server("2 Coke", config).await;

    let form = Form::new().text("order_id", "101").part("image", jpeg_part());
    let response = reqwest::Client::new()
        .post(format!("{base}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_upload_beyond_body_limit_is_413() {
    let config = Config {
        max_image_bytes: 16,
        ..Config::default()
    };
    let base = spawn_server("2 Coke", config).await;

    let big = Part::bytes(vec![0xAB; 200_000])
        .file_name("capture.jpg")
        .mime_str("image/jpeg")
        .unwrap();
    let form = Form::new().text("order_id", "101").part("image", big);
    let response = reqwest::Client::new()
        .post(format!("{base}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("请求体超出上限"));
}

#[tokio::test]
async fn test_detections_endpoint_applies_threshold() {
    let base = spawn_server("", Config::default()).await;

    let payload = serde_json::json!({
        "order_id": 101,
        "detections": [
            {"label": "Coke", "confidence": 0.95},
            {"label": "coke", "confidence": 0.90},
            {"label": "Orange Juice 1L", "confidence": 0.60},
            {"label": "Chips Classic", "confidence": 0.82}
        ]
    });
    let response = reqwest::Client::new()
        .post(format!("{base}/detections"))
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let report: ReconcileReport = response.json().await.unwrap();
    assert_eq!(report.total_detected, 4);
    assert_eq!(report.unidentified_count, 1);
    assert_eq!(report.missing_items, QuantityMapping::from([("Chips", 1)]));
    assert_eq!(report.extra_items, QuantityMapping::from([("Chips Classic", 1)]));
    assert!(report.raw_response.is_none());
}

#[tokio::test]
async fn test_finalize_and_health() {
    let base = spawn_server("", Config::default()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/finalize/102"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["order_id"], 102);
    assert_eq!(body["status"], "finalized");

    let response = client
        .post(format!("{base}/finalize/555"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
