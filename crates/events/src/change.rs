use serde::{Deserialize, Serialize};

use lineguard_core::{DetectionRecord, InspectionError};

use crate::attribute::Image;

/// Operation a change event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Insert,
    Modify,
    Remove,
}

/// Item images and stream position carried by one change event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamRecord {
    #[serde(default)]
    pub keys: Image,

    /// Item after the change. Present for inserts and modifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_image: Option<Image>,

    /// Item before the change. Present for modifications and removals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_image: Option<Image>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_view_type: Option<String>,

    /// Epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_creation_date_time: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// One entry of the record store's change stream.
///
/// Notes:
/// - The store is append-only, so in practice only inserts appear. Consumers still
///   filter on `operation`.
/// - `region` is where the change originated and is copied into analytics rows.
///   Only inserts need it; other operations decode without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "eventID", default, skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,

    #[serde(rename = "eventName")]
    operation: OperationType,

    #[serde(rename = "eventSource", default, skip_serializing_if = "Option::is_none")]
    event_source: Option<String>,

    #[serde(rename = "awsRegion", default, skip_serializing_if = "Option::is_none")]
    region: Option<String>,

    #[serde(rename = "dynamodb", default)]
    record: StreamRecord,
}

impl ChangeEvent {
    pub fn new(
        event_id: impl Into<String>,
        operation: OperationType,
        region: impl Into<String>,
        record: StreamRecord,
    ) -> Self {
        Self {
            event_id: Some(event_id.into()),
            operation,
            event_source: Some("aws:dynamodb".to_string()),
            region: Some(region.into()),
            record,
        }
    }

    /// The insert event the record store emits for a freshly written record.
    pub fn insert(record: &DetectionRecord, region: impl Into<String>, sequence: u64) -> Self {
        let stream = StreamRecord {
            keys: Image::key_of(record),
            new_image: Some(Image::from_record(record)),
            old_image: None,
            sequence_number: Some(sequence.to_string()),
            stream_view_type: Some("NEW_AND_OLD_IMAGES".to_string()),
            approximate_creation_date_time: None,
            size_bytes: None,
        };
        Self::new(format!("insert-{sequence}"), OperationType::Insert, region, stream)
    }

    /// Decode a single raw change-stream entry.
    pub fn from_json(value: serde_json::Value) -> Result<Self, InspectionError> {
        serde_json::from_value(value)
            .map_err(|e| InspectionError::input(format!("malformed change event: {e}")))
    }

    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn operation(&self) -> OperationType {
        self.operation
    }

    pub fn is_insert(&self) -> bool {
        self.operation == OperationType::Insert
    }

    pub fn event_source(&self) -> Option<&str> {
        self.event_source.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn record(&self) -> &StreamRecord {
        &self.record
    }

    /// The post-change image, required for inserts.
    pub fn new_image(&self) -> Result<&Image, InspectionError> {
        self.record
            .new_image
            .as_ref()
            .ok_or_else(|| InspectionError::missing("NewImage"))
    }
}
