use async_trait::async_trait;

use lineguard_core::{DetectionRecord, InspectionResult};

/// Append-only store of detection records.
///
/// The `RecordStore` is the **durable layer** for detections. Each record is one
/// observation, keyed by `(CameraId, DateTime)`.
///
/// ## Design Principles
///
/// - **Insert-only**: records are never updated or deleted through this interface
/// - **No deduplication**: a replayed trigger produces a second, distinct record
/// - **No transactions**: a write is not coordinated with alerting or analytics
///   (at-least-once across the pipeline)
///
/// ## Change Stream
///
/// Implementations backed by a real store are expected to emit one insert change
/// event per successful write; the change-capture transformer consumes those.
///
/// ## Errors
///
/// An unavailable store or a rejected write is reported as
/// `InspectionError::Dependency` and never retried here.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record.
    async fn insert(&self, record: &DetectionRecord) -> InspectionResult<()>;
}
