use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDateTime, TimeDelta};
use tracing::{info, instrument, warn};

use lineguard_core::{DetectionRecord, DetectionResult, InspectionResult};

use super::r#trait::RecordStore;

/// Source of persistence timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time, no offset.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Deterministic clock for tests: returns `start`, then advances by `step` per call.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<NaiveDateTime>,
    step: TimeDelta,
}

impl SteppingClock {
    pub fn new(start: NaiveDateTime, step: TimeDelta) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }

    pub fn fixed(at: NaiveDateTime) -> Self {
        Self::new(at, TimeDelta::zero())
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> NaiveDateTime {
        match self.next.lock() {
            Ok(mut next) => {
                let now = *next;
                *next = now + self.step;
                now
            }
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Persists detection results as new records.
///
/// The timestamp is taken when the record is written, not when the image was
/// captured or scored.
#[derive(Clone)]
pub struct RecordWriter {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl RecordWriter {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Stamp and insert. Returns the record exactly as written.
    #[instrument(skip_all, fields(camera_id = %result.camera_id, image_id = %result.image_id))]
    pub async fn write(&self, result: DetectionResult) -> InspectionResult<DetectionRecord> {
        let record = DetectionRecord::stamp(result, self.clock.now());

        self.store.insert(&record).await.inspect_err(|e| {
            warn!(date_time = %record.date_time, error = %e, "detection record write failed");
        })?;

        info!(date_time = %record.date_time, "detection record written");
        Ok(record)
    }
}
