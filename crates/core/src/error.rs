//! Pipeline error model.

use thiserror::Error;

/// Names of the external collaborators, as reported in `Dependency` errors.
pub mod service {
    pub const OBJECT_STORE: &str = "object-store";
    pub const ANOMALY_DETECTION: &str = "anomaly-detection";
    pub const RECORD_STORE: &str = "record-store";
    pub const NOTIFICATION: &str = "notification";
    pub const ANALYTICS_SINK: &str = "analytics-sink";
}

/// Result type used across the inspection pipeline.
pub type InspectionResult<T> = Result<T, InspectionError>;

/// Inspection pipeline error.
///
/// Two families only:
/// - `Input`: the trigger event or object metadata is malformed. Retrying the same
///   input cannot succeed.
/// - `Dependency`: an external collaborator (object store, detection service, record
///   store, notification service, analytics sink) was unavailable or rejected the call.
///   The orchestrator owns the retry policy.
///
/// Per-record failures inside a change-capture batch are *not* errors; they are reported
/// as data by the transformer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InspectionError {
    /// Missing or malformed field in an event, payload or metadata.
    #[error("invalid input: {0}")]
    Input(String),

    /// An external service failed or rejected the request.
    #[error("{service} failed: {message}")]
    Dependency {
        service: &'static str,
        message: String,
    },
}

impl InspectionError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn dependency(service: &'static str, msg: impl Into<String>) -> Self {
        Self::Dependency {
            service,
            message: msg.into(),
        }
    }

    /// Missing required field (metadata key, attribute, payload member).
    pub fn missing(field: &str) -> Self {
        Self::Input(format!("missing required field '{field}'"))
    }

    /// Whether the caller may reasonably retry the whole invocation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Dependency { .. })
    }

    /// Stable short label for logs and API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Input(_) => "input_error",
            Self::Dependency { .. } => "dependency_error",
        }
    }
}
