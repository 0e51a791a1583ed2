use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use tracing::instrument;

use lineguard_core::error::service;
use lineguard_core::{Confidence, InspectionError, InspectionResult};
use lineguard_detection::{AnomalyScore, AnomalyScorer, ModelRef};

use super::sigv4::uri_encode;
use super::{AwsClient, ServiceCall};

const SIGNING_NAME: &str = "lookoutvision";
const API_VERSION: &str = "2020-11-20";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetectAnomaliesResponse {
    detect_anomaly_result: DetectAnomalyResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetectAnomalyResult {
    is_anomalous: bool,
    confidence: Confidence,
}

/// Canonical path of the DetectAnomalies operation.
///
/// Project names and versions are limited to `[a-zA-Z0-9_.-]`, so encoding once
/// gives the same canonical form as the service's double encoding.
pub fn detect_path(model: &ModelRef) -> String {
    format!(
        "/{API_VERSION}/projects/{}/models/{}/detect",
        uri_encode(&model.project_name),
        uri_encode(&model.model_version)
    )
}

pub fn parse_detect_response(body: &[u8]) -> InspectionResult<AnomalyScore> {
    let response: DetectAnomaliesResponse = serde_json::from_slice(body).map_err(|e| {
        InspectionError::dependency(service::ANOMALY_DETECTION, format!("unexpected response: {e}"))
    })?;
    Ok(AnomalyScore {
        is_anomalous: response.detect_anomaly_result.is_anomalous,
        confidence: response.detect_anomaly_result.confidence,
    })
}

/// Anomaly scorer over the Lookout for Vision DetectAnomalies API.
#[derive(Debug, Clone)]
pub struct LookoutVisionScorer {
    client: AwsClient,
}

impl LookoutVisionScorer {
    pub fn new(client: AwsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnomalyScorer for LookoutVisionScorer {
    #[instrument(skip_all, fields(project = %model.project_name, version = %model.model_version, bytes = body.len()))]
    async fn detect_anomalies(
        &self,
        model: &ModelRef,
        body: &[u8],
        content_type: &str,
    ) -> InspectionResult<AnomalyScore> {
        let call = ServiceCall {
            method: Method::POST,
            endpoint: self.client.service_endpoint(SIGNING_NAME),
            path: detect_path(model),
            headers: vec![("content-type", content_type.to_string())],
            body: body.to_vec(),
        };

        let response = self
            .client
            .execute(service::ANOMALY_DETECTION, SIGNING_NAME, call)
            .await?
            .error_for_status(service::ANOMALY_DETECTION)?;

        parse_detect_response(&response.body)
    }
}
