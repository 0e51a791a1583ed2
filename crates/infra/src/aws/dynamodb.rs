use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value as JsonValue, json};
use tracing::instrument;

use lineguard_core::error::service;
use lineguard_core::{DetectionRecord, InspectionResult};
use lineguard_events::Image;

use super::{AwsClient, ServiceCall};
use crate::record_store::RecordStore;

const SIGNING_NAME: &str = "dynamodb";
const CONTENT_TYPE: &str = "application/x-amz-json-1.0";
const PUT_ITEM_TARGET: &str = "DynamoDB_20120810.PutItem";

/// `PutItem` request body: the record as a typed item.
pub fn put_item_body(table: &str, record: &DetectionRecord) -> JsonValue {
    json!({
        "TableName": table,
        "Item": Image::from_record(record),
    })
}

/// Record store over the DynamoDB `PutItem` API.
///
/// Each write is a plain put keyed on `(CameraId, DateTime)`.
#[derive(Debug, Clone)]
pub struct DynamoDbRecordStore {
    client: AwsClient,
    table: String,
}

impl DynamoDbRecordStore {
    pub fn new(client: AwsClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl RecordStore for DynamoDbRecordStore {
    #[instrument(skip_all, fields(table = %self.table, camera_id = %record.camera_id))]
    async fn insert(&self, record: &DetectionRecord) -> InspectionResult<()> {
        let call = ServiceCall {
            method: Method::POST,
            endpoint: self.client.service_endpoint(SIGNING_NAME),
            path: "/".to_string(),
            headers: vec![
                ("content-type", CONTENT_TYPE.to_string()),
                ("x-amz-target", PUT_ITEM_TARGET.to_string()),
            ],
            body: put_item_body(&self.table, record).to_string().into_bytes(),
        };

        self.client
            .execute(service::RECORD_STORE, SIGNING_NAME, call)
            .await?
            .error_for_status(service::RECORD_STORE)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineguard_core::{AssemblyLineId, CameraId, ImageId};
    use lineguard_core::Confidence;

    #[test]
    fn item_uses_typed_attributes() {
        let record = DetectionRecord {
            camera_id: CameraId::parse("cam-01").unwrap(),
            date_time: "2024-03-05T14:22:10.123456".to_string(),
            assembly_line_id: AssemblyLineId::parse("line-a").unwrap(),
            image_id: ImageId::parse("img-0001").unwrap(),
            image_url: "s3://captures/img-0001.jpg".to_string(),
            is_anomalous: true,
            confidence: Confidence::parse("0.9100").unwrap(),
        };

        assert_eq!(
            put_item_body("detections", &record),
            json!({
                "TableName": "detections",
                "Item": {
                    "CameraId": { "S": "cam-01" },
                    "DateTime": { "S": "2024-03-05T14:22:10.123456" },
                    "AssemblyLineId": { "S": "line-a" },
                    "ImageId": { "S": "img-0001" },
                    "ImageUrl": { "S": "s3://captures/img-0001.jpg" },
                    "IsAnomalous": { "BOOL": true },
                    "Confidence": { "N": "0.9100" }
                }
            })
        );
    }
}
