use std::collections::HashMap;
use std::sync::Arc;

use lineguard_api::app::services::{MemoryBackends, memory_services};
use lineguard_core::Confidence;
use lineguard_detection::{AnomalyScore, ObjectRef, StoredObject};
use lineguard_infra::config::PipelineConfig;
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    backends: MemoryBackends,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(is_anomalous: bool, confidence: &str) -> Self {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("LFV_PROJECT_NAME", "line-inspection"),
            ("LFV_MODEL_VERSION", "3"),
            ("TARGET_ARN", "arn:aws:sns:eu-west-1:123456789012:defect-alerts"),
            ("CONFIDENCE_THRESHOLD", "0.50"),
            ("DELIVERY_STREAM_NAME", "detections-analytics"),
            ("REGION", "eu-west-1"),
            ("DYNAMODB_TABLE_NAME", "detections"),
        ]);
        let config = PipelineConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();

        let verdict = AnomalyScore {
            is_anomalous,
            confidence: Confidence::parse(confidence).unwrap(),
        };
        let (services, backends) = memory_services(&config, verdict);

        // Same router as prod, bound to an ephemeral port.
        let app = lineguard_api::app::build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            backends,
            handle,
        }
    }

    fn seed_image(&self, key: &str, image_id: &str) {
        self.backends
            .objects
            .put(
                ObjectRef::new("captures", key).unwrap(),
                StoredObject::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg")
                    .with_metadata("CameraId", "cam-01")
                    .with_metadata("AssemblyLineId", "line-a")
                    .with_metadata("ImageId", image_id),
            )
            .unwrap();
    }

    async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let res = reqwest::Client::new()
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        let body = res.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let srv = TestServer::spawn(false, "0.9").await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn orchestrated_run_detect_record_alert() {
    let srv = TestServer::spawn(true, "0.40").await;
    srv.seed_image("line-a/img-0001.jpg", "img-0001");

    let (status, detection) = srv
        .post(
            "/v1/detect",
            &json!({ "Input": { "Bucket": "captures", "Key": "line-a/img-0001.jpg" } }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detection["CameraId"], "cam-01");
    assert_eq!(detection["ImageUrl"], "s3://captures/line-a/img-0001.jpg");
    assert_eq!(detection["IsAnomalous"], true);

    let (status, stored) = srv
        .post("/v1/records", &json!({ "Input": { "Payload": detection } }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let date_time = stored["ImageDetails"]["DateTime"].as_str().unwrap();
    assert_eq!(date_time.len(), "2024-03-05T14:22:10.123456".len());

    let (status, dispatch) = srv
        .post("/v1/alerts", &json!({ "Input": { "Payload": stored } }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dispatch["Outcome"], "LowConfidenceAnomaly");
    assert!(dispatch["MessageId"].is_string());

    let published = srv.backends.notifier.published();
    assert_eq!(published.len(), 1);
    assert!(published[0].message.subject.starts_with("LOW Confidence - "));
}

#[tokio::test]
async fn suppressed_alert_returns_null_message_id() {
    let srv = TestServer::spawn(false, "0.90").await;
    let record = json!({
        "CameraId": "cam-01",
        "DateTime": "2024-03-05T14:22:10.123456",
        "AssemblyLineId": "line-a",
        "ImageId": "img-0002",
        "ImageUrl": "s3://captures/img-0002.jpg",
        "IsAnomalous": false,
        "Confidence": 0.9
    });

    let (status, dispatch) = srv
        .post("/v1/alerts", &json!({ "Input": { "Payload": { "ImageDetails": record } } }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dispatch, json!({ "Outcome": "Suppressed", "MessageId": null }));
    assert_eq!(srv.backends.notifier.count(), 0);
}

#[tokio::test]
async fn missing_metadata_is_an_input_error() {
    let srv = TestServer::spawn(true, "0.9").await;
    srv.backends
        .objects
        .put(
            ObjectRef::new("captures", "untagged.jpg").unwrap(),
            StoredObject::new(vec![1], "image/jpeg"),
        )
        .unwrap();

    let (status, body) = srv
        .post("/v1/detect", &json!({ "Input": { "Bucket": "captures", "Key": "untagged.jpg" } }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "input_error");
    assert_eq!(srv.backends.scorer.calls(), 0);
}

#[tokio::test]
async fn missing_object_is_a_dependency_error() {
    let srv = TestServer::spawn(true, "0.9").await;

    let (status, body) = srv
        .post("/v1/detect", &json!({ "Input": { "Bucket": "captures", "Key": "nope.jpg" } }))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "dependency_error");
    assert_eq!(body["service"], "object-store");
}

#[tokio::test]
async fn record_store_outage_surfaces_as_bad_gateway() {
    let srv = TestServer::spawn(true, "0.9").await;
    srv.backends.records.set_available(false);

    let payload = json!({
        "CameraId": "cam-01",
        "AssemblyLineId": "line-a",
        "ImageId": "img-0003",
        "ImageUrl": "s3://captures/img-0003.jpg",
        "IsAnomalous": true,
        "Confidence": 0.91
    });
    let (status, body) = srv.post("/v1/records", &json!({ "Input": { "Payload": payload } })).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["service"], "record-store");
}

#[tokio::test]
async fn blank_camera_id_is_an_input_error() {
    let srv = TestServer::spawn(true, "0.9").await;

    let payload = json!({
        "CameraId": "  ",
        "AssemblyLineId": "line-a",
        "ImageId": "img-0005",
        "ImageUrl": "s3://captures/img-0005.jpg",
        "IsAnomalous": true,
        "Confidence": 0.91
    });
    let (status, body) = srv.post("/v1/records", &json!({ "Input": { "Payload": payload } })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "input_error");
    assert!(srv.backends.records.is_empty());
}

#[tokio::test]
async fn change_capture_reports_partial_failures() {
    let srv = TestServer::spawn(true, "0.9").await;
    srv.seed_image("line-a/img-0004.jpg", "img-0004");

    let (_, detection) = srv
        .post(
            "/v1/detect",
            &json!({ "Input": { "Bucket": "captures", "Key": "line-a/img-0004.jpg" } }),
        )
        .await;
    srv.post("/v1/records", &json!({ "Input": { "Payload": detection.clone() } })).await;
    srv.post("/v1/records", &json!({ "Input": { "Payload": detection } })).await;

    let mut batch = serde_json::to_value(srv.backends.records.change_batch()).unwrap();
    batch["Records"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "eventName": "INSERT", "awsRegion": "eu-west-1", "dynamodb": {} }));

    let (status, body) = srv.post("/v1/change-capture", &batch).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully processed 3 records.");
    assert_eq!(body["appended"], 2);
    assert_eq!(body["failed"], 1);
    assert_eq!(body["failures"][0]["position"], 2);

    let rows = srv.backends.analytics.records("detections-analytics").unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.region == "eu-west-1"));
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let srv = TestServer::spawn(true, "0.9").await;

    let res = reqwest::Client::new()
        .post(format!("{}/v1/detect", srv.base_url))
        .header("content-type", "application/json")
        .body("{\"Input\":")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "input_error");
}
