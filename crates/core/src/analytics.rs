//! Flat analytics rows derived from detection records.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::InspectionError;

/// Accepted layout for record timestamps read back from the change stream.
/// The fractional part is optional; an offset suffix is not accepted.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Calendar fields decomposed from a naive record timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl CalendarParts {
    pub fn parse(date_time: &str) -> Result<Self, InspectionError> {
        let parsed = NaiveDateTime::parse_from_str(date_time, PARSE_FORMAT).map_err(|e| {
            InspectionError::input(format!("unparseable DateTime '{date_time}': {e}"))
        })?;
        Ok(Self::from(parsed))
    }
}

impl From<NaiveDateTime> for CalendarParts {
    fn from(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
        }
    }
}

/// A denormalized, append-only copy of one detection record for the analytics sink.
///
/// `date_time` and `confidence` are carried verbatim from the record store; the
/// calendar fields are always derived from that same `date_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalyticsRecord {
    pub assembly_line_id: String,
    pub camera_id: String,
    pub image_id: String,
    pub image_url: String,
    pub date_time: String,
    pub is_anomalous: bool,
    /// Decimal text exactly as stored.
    pub confidence: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub region: String,
}

/// Source fields for an analytics row, before calendar decomposition.
#[derive(Debug, Clone)]
pub struct AnalyticsSource {
    pub assembly_line_id: String,
    pub camera_id: String,
    pub image_id: String,
    pub image_url: String,
    pub date_time: String,
    pub is_anomalous: bool,
    pub confidence: String,
    pub region: String,
}

impl AnalyticsRecord {
    pub fn build(source: AnalyticsSource) -> Result<Self, InspectionError> {
        let parts = CalendarParts::parse(&source.date_time)?;
        Ok(Self {
            assembly_line_id: source.assembly_line_id,
            camera_id: source.camera_id,
            image_id: source.image_id,
            image_url: source.image_url,
            date_time: source.date_time,
            is_anomalous: source.is_anomalous,
            confidence: source.confidence,
            year: parts.year,
            month: parts.month,
            day: parts.day,
            hour: parts.hour,
            minute: parts.minute,
            region: source.region,
        })
    }

    pub fn calendar(&self) -> CalendarParts {
        CalendarParts {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
        }
    }

    /// One JSON object terminated by `\n`, the delivery stream's record framing.
    pub fn to_json_line(&self) -> Result<Vec<u8>, InspectionError> {
        let mut line = serde_json::to_vec(self)
            .map_err(|e| InspectionError::input(format!("analytics record serialization failed: {e}")))?;
        line.push(b'\n');
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(date_time: &str) -> AnalyticsSource {
        AnalyticsSource {
            assembly_line_id: "line-a".to_string(),
            camera_id: "cam-01".to_string(),
            image_id: "img-1".to_string(),
            image_url: "s3://captures/img-1.jpg".to_string(),
            date_time: date_time.to_string(),
            is_anomalous: true,
            confidence: "0.9100".to_string(),
            region: "eu-west-1".to_string(),
        }
    }

    #[test]
    fn decomposes_record_timestamp() {
        let parts = CalendarParts::parse("2024-03-05T14:22:10.123456").unwrap();
        assert_eq!(
            parts,
            CalendarParts { year: 2024, month: 3, day: 5, hour: 14, minute: 22 }
        );
    }

    #[test]
    fn fraction_is_optional_but_offsets_are_rejected() {
        assert!(CalendarParts::parse("2024-12-31T23:59:59").is_ok());
        assert!(CalendarParts::parse("2024-03-05T14:22:10.123456+00:00").is_err());
        assert!(CalendarParts::parse("05/03/2024 14:22").is_err());
        assert!(CalendarParts::parse("2024-02-30T00:00:00.000000").is_err());
    }

    #[test]
    fn record_copies_confidence_verbatim() {
        let record = AnalyticsRecord::build(source("2024-03-05T14:22:10.123456")).unwrap();
        assert_eq!(record.confidence, "0.9100");
        assert_eq!(record.calendar(), CalendarParts::parse(&record.date_time).unwrap());
    }

    #[test]
    fn json_line_is_newline_terminated_pascal_case() {
        let record = AnalyticsRecord::build(source("2024-03-05T14:22:10.123456")).unwrap();
        let line = record.to_json_line().unwrap();
        assert_eq!(line.last(), Some(&b'\n'));

        let value: serde_json::Value = serde_json::from_slice(&line).unwrap();
        assert_eq!(value["Year"], 2024);
        assert_eq!(value["Minute"], 22);
        assert_eq!(value["Confidence"], "0.9100");
        assert_eq!(value["Region"], "eu-west-1");
    }
}
