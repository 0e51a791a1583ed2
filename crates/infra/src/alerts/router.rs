use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use lineguard_core::{AlertOutcome, Confidence, DetectionRecord, InspectionResult};

use super::message::compose;
use super::notifier::Notifier;

/// What the router did for one record.
///
/// `message_id == None` is the explicit "no notification" marker (Suppressed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlertDispatch {
    pub outcome: AlertOutcome,
    pub message_id: Option<String>,
}

impl AlertDispatch {
    pub fn is_sent(&self) -> bool {
        self.message_id.is_some()
    }
}

/// Routes persisted records to at most one notification.
///
/// Threshold and topic are fixed for the router's lifetime. Routing the same record
/// twice sends twice; there is no deduplication here.
#[derive(Clone)]
pub struct AlertRouter {
    notifier: Arc<dyn Notifier>,
    topic: String,
    threshold: Confidence,
}

impl AlertRouter {
    pub fn new(notifier: Arc<dyn Notifier>, topic: impl Into<String>, threshold: Confidence) -> Self {
        Self {
            notifier,
            topic: topic.into(),
            threshold,
        }
    }

    pub fn threshold(&self) -> Confidence {
        self.threshold
    }

    pub fn classify(&self, record: &DetectionRecord) -> AlertOutcome {
        AlertOutcome::classify(record.is_anomalous, record.confidence, self.threshold)
    }

    #[instrument(skip_all, fields(camera_id = %record.camera_id, image_id = %record.image_id))]
    pub async fn route(&self, record: &DetectionRecord) -> InspectionResult<AlertDispatch> {
        let outcome = self.classify(record);

        let Some(message) = compose(outcome, record) else {
            info!(outcome = %outcome, "no notification required");
            return Ok(AlertDispatch {
                outcome,
                message_id: None,
            });
        };

        let message_id = self
            .notifier
            .publish(&self.topic, &message)
            .await
            .inspect_err(|e| {
                error!(outcome = %outcome, topic = %self.topic, error = %e, "alert dispatch failed");
            })?;

        info!(outcome = %outcome, topic = %self.topic, message_id = %message_id, "alert published");
        Ok(AlertDispatch {
            outcome,
            message_id: Some(message_id),
        })
    }
}
