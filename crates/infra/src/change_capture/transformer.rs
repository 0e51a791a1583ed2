use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use lineguard_core::{AnalyticsRecord, AnalyticsSource, InspectionError};
use lineguard_events::{ChangeBatch, ChangeEvent, names};

use super::sink::AnalyticsSink;

/// Why one change event did not reach the analytics sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    /// Zero-based position in the batch.
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub reason: String,
    pub retryable: bool,
}

/// Outcome of one batch.
///
/// `attempted` counts every entry in the batch, whatever happened to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeCaptureReport {
    pub attempted: usize,
    pub appended: usize,
    pub skipped: usize,
    pub failures: Vec<RecordFailure>,
}

impl ChangeCaptureReport {
    pub fn summary(&self) -> String {
        format!("Successfully processed {} records.", self.attempted)
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn absorb(&mut self, position: usize, event_id: Option<String>, step: Step) {
        self.attempted += 1;
        match step {
            Step::Appended => self.appended += 1,
            Step::Skipped => self.skipped += 1,
            Step::Failed(err) => self.failures.push(RecordFailure {
                position,
                event_id,
                retryable: err.is_retryable(),
                reason: err.to_string(),
            }),
        }
    }
}

enum Step {
    Appended,
    Skipped,
    Failed(InspectionError),
}

/// Flatten one insert event into an analytics row.
pub fn analytics_record(event: &ChangeEvent) -> Result<AnalyticsRecord, InspectionError> {
    let image = event.new_image()?;
    let region = event.region().ok_or_else(|| InspectionError::missing("awsRegion"))?;
    AnalyticsRecord::build(AnalyticsSource {
        assembly_line_id: image.string(names::ASSEMBLY_LINE_ID)?.to_string(),
        camera_id: image.string(names::CAMERA_ID)?.to_string(),
        image_id: image.string(names::IMAGE_ID)?.to_string(),
        image_url: image.string(names::IMAGE_URL)?.to_string(),
        date_time: image.string(names::DATE_TIME)?.to_string(),
        is_anomalous: image.boolean(names::IS_ANOMALOUS)?,
        confidence: image.number(names::CONFIDENCE)?.to_string(),
        region: region.to_string(),
    })
}

/// Copies inserted detection records into the analytics delivery stream.
///
/// Each entry is handled on its own: a malformed event or a rejected put is
/// reported in the batch report and does not stop the entries after it.
#[derive(Clone)]
pub struct ChangeCaptureTransformer {
    sink: Arc<dyn AnalyticsSink>,
    stream_name: String,
}

impl ChangeCaptureTransformer {
    pub fn new(sink: Arc<dyn AnalyticsSink>, stream_name: impl Into<String>) -> Self {
        Self {
            sink,
            stream_name: stream_name.into(),
        }
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    #[instrument(skip_all, fields(stream = %self.stream_name, batch_len = batch.len()))]
    pub async fn process(&self, batch: &ChangeBatch) -> ChangeCaptureReport {
        let mut report = ChangeCaptureReport::default();

        for (position, decoded) in batch.events().enumerate() {
            let (event_id, step) = match decoded {
                Ok(event) => {
                    let id = event.event_id().map(str::to_string);
                    (id, self.forward(&event).await)
                }
                Err(err) => (None, Step::Failed(err)),
            };

            if let Step::Failed(err) = &step {
                warn!(position, event_id = ?event_id, error = %err, "change event not forwarded");
            }
            report.absorb(position, event_id, step);
        }

        info!(
            attempted = report.attempted,
            appended = report.appended,
            skipped = report.skipped,
            failed = report.failures.len(),
            "change batch processed"
        );
        report
    }

    async fn forward(&self, event: &ChangeEvent) -> Step {
        if !event.is_insert() {
            debug!(operation = ?event.operation(), "ignoring non-insert change");
            return Step::Skipped;
        }

        let line = match analytics_record(event).and_then(|row| row.to_json_line()) {
            Ok(line) => line,
            Err(err) => return Step::Failed(err),
        };

        match self.sink.put_record(&self.stream_name, line).await {
            Ok(record_id) => {
                debug!(record_id = %record_id, "analytics record appended");
                Step::Appended
            }
            Err(err) => Step::Failed(err),
        }
    }
}
