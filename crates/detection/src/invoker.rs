use std::sync::Arc;

use tracing::{info, instrument, warn};

use lineguard_core::{AssemblyLineId, CameraId, DetectionResult, ImageId, InspectionResult};

use crate::object_store::{ObjectRef, ObjectStore};
use crate::scorer::{AnomalyScorer, ModelRef};

/// Metadata keys attached to every captured image at upload time.
pub mod metadata {
    pub const CAMERA_ID: &str = "cameraid";
    pub const ASSEMBLY_LINE_ID: &str = "assemblylineid";
    pub const IMAGE_ID: &str = "imageid";
}

/// Scores one stored image and attaches its provenance.
///
/// Stateless apart from the injected clients and model reference; every failure is
/// surfaced to the caller unchanged (retry policy belongs to the orchestrator).
#[derive(Clone)]
pub struct DetectionInvoker {
    objects: Arc<dyn ObjectStore>,
    scorer: Arc<dyn AnomalyScorer>,
    model: ModelRef,
}

impl DetectionInvoker {
    pub fn new(objects: Arc<dyn ObjectStore>, scorer: Arc<dyn AnomalyScorer>, model: ModelRef) -> Self {
        Self {
            objects,
            scorer,
            model,
        }
    }

    pub fn model(&self) -> &ModelRef {
        &self.model
    }

    #[instrument(skip_all, fields(bucket = %object.bucket, key = %object.key))]
    pub async fn detect(&self, object: &ObjectRef) -> InspectionResult<DetectionResult> {
        let stored = self.objects.get_object(object).await.inspect_err(|e| {
            warn!(error = %e, "failed to fetch image");
        })?;

        // Validate provenance before spending a scoring call on the image.
        let camera_id = CameraId::parse(stored.required_metadata(metadata::CAMERA_ID)?)?;
        let assembly_line_id =
            AssemblyLineId::parse(stored.required_metadata(metadata::ASSEMBLY_LINE_ID)?)?;
        let image_id = ImageId::parse(stored.required_metadata(metadata::IMAGE_ID)?)?;

        let score = self
            .scorer
            .detect_anomalies(&self.model, &stored.body, &stored.content_type)
            .await
            .inspect_err(|e| {
                warn!(image_id = %image_id, error = %e, "anomaly detection call failed");
            })?;

        info!(
            camera_id = %camera_id,
            image_id = %image_id,
            is_anomalous = score.is_anomalous,
            confidence = %score.confidence,
            "image scored"
        );

        Ok(DetectionResult {
            camera_id,
            assembly_line_id,
            image_id,
            image_url: object.url(),
            is_anomalous: score.is_anomalous,
            confidence: score.confidence,
        })
    }
}
