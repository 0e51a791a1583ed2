use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lineguard_core::{DetectionRecord, InspectionError};

/// Attribute names of a detection record in the record store.
pub mod names {
    pub const CAMERA_ID: &str = "CameraId";
    pub const DATE_TIME: &str = "DateTime";
    pub const ASSEMBLY_LINE_ID: &str = "AssemblyLineId";
    pub const IMAGE_ID: &str = "ImageId";
    pub const IMAGE_URL: &str = "ImageUrl";
    pub const IS_ANOMALOUS: &str = "IsAnomalous";
    pub const CONFIDENCE: &str = "Confidence";
}

/// A tagged primitive as it appears in record store items and change images.
///
/// Wire form is a single-key object naming the type: `{"S": "cam-01"}`,
/// `{"N": "0.91"}`, `{"BOOL": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    S(String),
    /// Number, always carried as decimal text.
    N(String),
    /// Binary, base64 text.
    B(String),
    #[serde(rename = "BOOL")]
    Bool(bool),
    #[serde(rename = "NULL")]
    Null(bool),
    M(BTreeMap<String, AttributeValue>),
    L(Vec<AttributeValue>),
    #[serde(rename = "SS")]
    StringSet(Vec<String>),
    #[serde(rename = "NS")]
    NumberSet(Vec<String>),
    #[serde(rename = "BS")]
    BinarySet(Vec<String>),
}

impl AttributeValue {
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::B(_) => "B",
            Self::Bool(_) => "BOOL",
            Self::Null(_) => "NULL",
            Self::M(_) => "M",
            Self::L(_) => "L",
            Self::StringSet(_) => "SS",
            Self::NumberSet(_) => "NS",
            Self::BinarySet(_) => "BS",
        }
    }
}

/// An item image: attribute name to tagged value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Image(BTreeMap<String, AttributeValue>);

impl Image {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.0.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn require(&self, name: &str) -> Result<&AttributeValue, InspectionError> {
        self.0.get(name).ok_or_else(|| InspectionError::missing(name))
    }

    fn mistyped(name: &str, expected: &str, found: &AttributeValue) -> InspectionError {
        InspectionError::input(format!(
            "attribute '{name}' expected type {expected}, found {}",
            found.type_tag()
        ))
    }

    /// Value of a string-typed (`S`) attribute.
    pub fn string(&self, name: &str) -> Result<&str, InspectionError> {
        let value = self.require(name)?;
        value.as_s().ok_or_else(|| Self::mistyped(name, "S", value))
    }

    /// Decimal text of a number-typed (`N`) attribute, unparsed.
    pub fn number(&self, name: &str) -> Result<&str, InspectionError> {
        let value = self.require(name)?;
        value.as_n().ok_or_else(|| Self::mistyped(name, "N", value))
    }

    pub fn boolean(&self, name: &str) -> Result<bool, InspectionError> {
        let value = self.require(name)?;
        value.as_bool().ok_or_else(|| Self::mistyped(name, "BOOL", value))
    }

    /// The item a detection record is stored as.
    pub fn from_record(record: &DetectionRecord) -> Self {
        Self::new()
            .with(names::CAMERA_ID, AttributeValue::S(record.camera_id.to_string()))
            .with(names::DATE_TIME, AttributeValue::S(record.date_time.clone()))
            .with(
                names::ASSEMBLY_LINE_ID,
                AttributeValue::S(record.assembly_line_id.to_string()),
            )
            .with(names::IMAGE_URL, AttributeValue::S(record.image_url.clone()))
            .with(names::IMAGE_ID, AttributeValue::S(record.image_id.to_string()))
            .with(names::IS_ANOMALOUS, AttributeValue::Bool(record.is_anomalous))
            .with(names::CONFIDENCE, AttributeValue::N(record.confidence.to_string()))
    }

    /// Primary key attributes of a detection record item.
    pub fn key_of(record: &DetectionRecord) -> Self {
        Self::new()
            .with(names::CAMERA_ID, AttributeValue::S(record.camera_id.to_string()))
            .with(names::DATE_TIME, AttributeValue::S(record.date_time.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineguard_core::{AssemblyLineId, CameraId, ImageId};
    use lineguard_core::Confidence;

    fn record() -> DetectionRecord {
        DetectionRecord {
            camera_id: CameraId::parse("cam-01").unwrap(),
            date_time: "2024-03-05T14:22:10.123456".to_string(),
            assembly_line_id: AssemblyLineId::parse("line-a").unwrap(),
            image_id: ImageId::parse("img-1").unwrap(),
            image_url: "s3://captures/img-1.jpg".to_string(),
            is_anomalous: false,
            confidence: Confidence::parse("0.870").unwrap(),
        }
    }

    #[test]
    fn tagged_values_use_type_names_on_the_wire() {
        let json = serde_json::to_value(AttributeValue::Bool(true)).unwrap();
        assert_eq!(json, serde_json::json!({ "BOOL": true }));

        let parsed: AttributeValue = serde_json::from_str(r#"{"N": "0.91"}"#).unwrap();
        assert_eq!(parsed.as_n(), Some("0.91"));
    }

    #[test]
    fn image_from_record_keeps_decimal_text() {
        let image = Image::from_record(&record());
        assert_eq!(image.number(names::CONFIDENCE).unwrap(), "0.870");
        assert!(!image.boolean(names::IS_ANOMALOUS).unwrap());
        assert_eq!(image.len(), 7);
    }

    #[test]
    fn getters_report_missing_and_mistyped_attributes() {
        let image = Image::from_record(&record());

        let err = image.string("Missing").unwrap_err();
        assert!(err.to_string().contains("'Missing'"));

        let err = image.string(names::IS_ANOMALOUS).unwrap_err();
        assert!(err.to_string().contains("expected type S, found BOOL"));
    }

    #[test]
    fn nested_maps_round_trip() {
        let json = r#"{"M": {"inner": {"L": [{"S": "a"}, {"NULL": true}]}}}"#;
        let value: AttributeValue = serde_json::from_str(json).unwrap();
        assert_eq!(value.type_tag(), "M");
    }
}
