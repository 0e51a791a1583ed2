use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lineguard_core::error::service;
use lineguard_core::{Confidence, InspectionError, InspectionResult};

/// Which trained model to score with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    pub project_name: String,
    pub model_version: String,
}

impl ModelRef {
    pub fn new(project_name: impl Into<String>, model_version: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            model_version: model_version.into(),
        }
    }
}

/// Verdict of the anomaly detection service for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyScore {
    pub is_anomalous: bool,
    pub confidence: Confidence,
}

/// Anomaly detection service boundary.
///
/// The model itself is opaque: an image goes in, a flag and a confidence come out.
#[async_trait]
pub trait AnomalyScorer: Send + Sync {
    async fn detect_anomalies(
        &self,
        model: &ModelRef,
        body: &[u8],
        content_type: &str,
    ) -> InspectionResult<AnomalyScore>;
}

/// A request as seen by [`FixedScorer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRequest {
    pub model: ModelRef,
    pub content_type: String,
    pub body_len: usize,
}

/// Scorer returning a preset verdict; records every request (tests/dev).
#[derive(Debug)]
pub struct FixedScorer {
    score: AnomalyScore,
    calls: AtomicUsize,
    requests: Mutex<Vec<ScoreRequest>>,
}

impl FixedScorer {
    pub fn new(score: AnomalyScore) -> Self {
        Self {
            score,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ScoreRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AnomalyScorer for FixedScorer {
    async fn detect_anomalies(
        &self,
        model: &ModelRef,
        body: &[u8],
        content_type: &str,
    ) -> InspectionResult<AnomalyScore> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .map_err(|_| InspectionError::dependency(service::ANOMALY_DETECTION, "lock poisoned"))?
            .push(ScoreRequest {
                model: model.clone(),
                content_type: content_type.to_string(),
                body_len: body.len(),
            });
        Ok(self.score)
    }
}
