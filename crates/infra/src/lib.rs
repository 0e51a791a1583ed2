//! Infrastructure layer: record store, alerting, change capture, config, and
//! the signed AWS wire adapters behind each boundary trait.

pub mod alerts;
pub mod aws;
pub mod change_capture;
pub mod config;
pub mod record_store;

mod integration_tests;

pub use alerts::{AlertDispatch, AlertMessage, AlertRouter, InMemoryNotifier, Notifier};
pub use change_capture::{
    AnalyticsSink, ChangeCaptureReport, ChangeCaptureTransformer, InMemoryAnalyticsSink, RecordFailure,
};
pub use config::{ConfigError, PipelineConfig};
pub use record_store::{Clock, InMemoryRecordStore, RecordStore, RecordWriter, SteppingClock, SystemClock};
