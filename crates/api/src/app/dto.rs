//! Orchestrator envelopes and response bodies.

use serde::{Deserialize, Serialize};

use lineguard_core::{DetectionRecord, DetectionResult};
use lineguard_infra::change_capture::{ChangeCaptureReport, RecordFailure};

// -------------------------
// Request DTOs
// -------------------------

/// `{"Input": ...}` wrapper the orchestrator puts around every stage input.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StageInput<T> {
    pub input: T,
}

/// `{"Payload": ...}`: the previous stage's output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payload<T> {
    pub payload: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

pub type DetectRequest = StageInput<ObjectLocation>;
pub type RecordRequest = StageInput<Payload<DetectionResult>>;
pub type AlertRequest = StageInput<Payload<ImageDetails>>;

// -------------------------
// Response DTOs
// -------------------------

/// Record-store stage output, consumed by the alert stage as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageDetails {
    pub image_details: DetectionRecord,
}

#[derive(Debug, Serialize)]
pub struct ChangeCaptureResponse {
    pub message: String,
    pub attempted: usize,
    pub appended: usize,
    pub skipped: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RecordFailure>,
}

impl From<ChangeCaptureReport> for ChangeCaptureResponse {
    fn from(report: ChangeCaptureReport) -> Self {
        Self {
            message: report.summary(),
            attempted: report.attempted,
            appended: report.appended,
            skipped: report.skipped,
            failed: report.failures.len(),
            failures: report.failures,
        }
    }
}
