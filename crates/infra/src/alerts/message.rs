use serde_json::json;

use lineguard_core::{AlertOutcome, DetectionRecord};

/// A notification ready for dispatch.
///
/// Carries one body per subscriber protocol: a machine-readable default (JSON text)
/// and a human-readable email variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub outcome: AlertOutcome,
    pub subject: String,
    pub default_body: String,
    pub email_body: String,
}

impl AlertMessage {
    /// Multi-protocol envelope: `{"default": "<json text>", "email": "<text>"}`.
    pub fn to_structured_json(&self) -> String {
        json!({
            "default": self.default_body,
            "email": self.email_body,
        })
        .to_string()
    }
}

/// Build the notification for an outcome. `None` for `Suppressed`.
pub fn compose(outcome: AlertOutcome, record: &DetectionRecord) -> Option<AlertMessage> {
    let location = format!(
        "AssemblyLine: {} Camera: {}",
        record.assembly_line_id, record.camera_id
    );
    let details = format!(
        "\nImage URL: {}\nDateTime:{}\nConfidence: {}",
        record.image_url, record.date_time, record.confidence
    );

    let (subject, email_body, summary) = match outcome {
        AlertOutcome::Suppressed => return None,
        AlertOutcome::HighConfidenceAnomaly => (
            format!("Defect Detection Alert - {location}"),
            format!("Defect detected for image with id: {}{details}", record.image_id),
            format!("Defect detected for image {}", record.image_url),
        ),
        AlertOutcome::LowConfidenceAnomaly => (
            format!("LOW Confidence - Defect Detection Alert - {location}"),
            format!(
                "Defect detected with LOW confidence for image with id: {}{details}",
                record.image_id
            ),
            format!("Defect detected for image {}", record.image_url),
        ),
        AlertOutcome::LowConfidenceNormal => (
            format!("Low Confidence Alert for Non-anomalous image - {location}"),
            format!(
                "Low Confidence for non-anomalous image - \nImageId:{}{details}",
                record.image_id
            ),
            format!("Low confidence for non-anomalous image {}", record.image_url),
        ),
    };

    Some(AlertMessage {
        outcome,
        subject,
        default_body: json!({ "Body": summary }).to_string(),
        email_body,
    })
}
