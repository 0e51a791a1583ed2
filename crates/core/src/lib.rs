//! `lineguard-core`: inspection pipeline data model.
//!
//! This crate contains **pure** types and decisions (no I/O, no clients).

pub mod alert;
pub mod analytics;
pub mod confidence;
pub mod detection;
pub mod error;
pub mod id;

pub use alert::AlertOutcome;
pub use analytics::{AnalyticsRecord, AnalyticsSource, CalendarParts};
pub use confidence::Confidence;
pub use detection::{DetectionRecord, DetectionResult, RECORD_TIMESTAMP_FORMAT, format_record_timestamp};
pub use error::{InspectionError, InspectionResult};
pub use id::{AssemblyLineId, CameraId, ImageId};
