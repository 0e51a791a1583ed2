//! Record-store change stream to analytics delivery stream.

pub mod sink;
pub mod transformer;

pub use sink::{AnalyticsSink, InMemoryAnalyticsSink};
pub use transformer::{ChangeCaptureReport, ChangeCaptureTransformer, RecordFailure, analytics_record};
