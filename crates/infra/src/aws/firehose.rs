use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use tracing::instrument;

use lineguard_core::error::service;
use lineguard_core::{InspectionError, InspectionResult};

use super::{AwsClient, ServiceCall};
use crate::change_capture::AnalyticsSink;

const SIGNING_NAME: &str = "firehose";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const PUT_RECORD_TARGET: &str = "Firehose_20150804.PutRecord";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PutRecordResponse {
    record_id: String,
}

pub fn put_record_body(stream: &str, data: &[u8]) -> JsonValue {
    json!({
        "DeliveryStreamName": stream,
        "Record": { "Data": STANDARD.encode(data) },
    })
}

pub fn parse_record_id(body: &[u8]) -> InspectionResult<String> {
    serde_json::from_slice::<PutRecordResponse>(body)
        .map(|r| r.record_id)
        .map_err(|e| InspectionError::dependency(service::ANALYTICS_SINK, format!("unexpected response: {e}")))
}

/// Analytics sink over the Firehose `PutRecord` API.
#[derive(Debug, Clone)]
pub struct FirehoseSink {
    client: AwsClient,
}

impl FirehoseSink {
    pub fn new(client: AwsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnalyticsSink for FirehoseSink {
    #[instrument(skip_all, fields(stream = %stream, bytes = data.len()))]
    async fn put_record(&self, stream: &str, data: Vec<u8>) -> InspectionResult<String> {
        let call = ServiceCall {
            method: Method::POST,
            endpoint: self.client.service_endpoint(SIGNING_NAME),
            path: "/".to_string(),
            headers: vec![
                ("content-type", CONTENT_TYPE.to_string()),
                ("x-amz-target", PUT_RECORD_TARGET.to_string()),
            ],
            body: put_record_body(stream, &data).to_string().into_bytes(),
        };

        let response = self
            .client
            .execute(service::ANALYTICS_SINK, SIGNING_NAME, call)
            .await?
            .error_for_status(service::ANALYTICS_SINK)?;

        parse_record_id(&response.body)
    }
}
