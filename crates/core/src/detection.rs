//! Detection results and the persisted detection record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::confidence::Confidence;
use crate::id::{AssemblyLineId, CameraId, ImageId};

/// Storage timestamp layout: naive local time, always six fractional digits.
pub const RECORD_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Scoring output for one image, with provenance attached. Not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectionResult {
    pub camera_id: CameraId,
    pub assembly_line_id: AssemblyLineId,
    pub image_id: ImageId,
    /// Location of the source object, `s3://<bucket>/<key>`.
    pub image_url: String,
    pub is_anomalous: bool,
    pub confidence: Confidence,
}

/// A persisted, immutable observation.
///
/// `date_time` is the moment the record was written, not when the image was captured
/// or scored. Downstream consumers (analytics, alert text) rely on this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectionRecord {
    pub camera_id: CameraId,
    pub date_time: String,
    pub assembly_line_id: AssemblyLineId,
    pub image_id: ImageId,
    pub image_url: String,
    pub is_anomalous: bool,
    pub confidence: Confidence,
}

impl DetectionRecord {
    /// Stamp a detection result with its persistence time.
    pub fn stamp(result: DetectionResult, written_at: NaiveDateTime) -> Self {
        Self {
            camera_id: result.camera_id,
            date_time: format_record_timestamp(written_at),
            assembly_line_id: result.assembly_line_id,
            image_id: result.image_id,
            image_url: result.image_url,
            is_anomalous: result.is_anomalous,
            confidence: result.confidence,
        }
    }
}

pub fn format_record_timestamp(at: NaiveDateTime) -> String {
    at.format(RECORD_TIMESTAMP_FORMAT).to_string()
}
