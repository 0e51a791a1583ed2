use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use lineguard_core::error::service;
use lineguard_core::{DetectionRecord, InspectionError, InspectionResult};
use lineguard_events::{ChangeBatch, ChangeEvent};

use super::r#trait::RecordStore;

/// In-memory append-only record store.
///
/// Intended for tests/dev. Keeps every insert in arrival order and can replay
/// them as the change events a durable store would emit.
#[derive(Debug)]
pub struct InMemoryRecordStore {
    region: String,
    records: RwLock<Vec<DetectionRecord>>,
    available: AtomicBool,
}

impl InMemoryRecordStore {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            records: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage: subsequent inserts fail with a dependency error.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<DetectionRecord> {
        self.records.read().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All inserts so far, as one change batch (sequence numbers start at 1).
    pub fn change_batch(&self) -> ChangeBatch {
        let records = self.records();
        ChangeBatch::from_events(
            records
                .iter()
                .enumerate()
                .map(|(idx, r)| ChangeEvent::insert(r, self.region.clone(), idx as u64 + 1)),
        )
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, record: &DetectionRecord) -> InspectionResult<()> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(InspectionError::dependency(
                service::RECORD_STORE,
                "record store unavailable",
            ));
        }

        let mut records = self
            .records
            .write()
            .map_err(|_| InspectionError::dependency(service::RECORD_STORE, "lock poisoned"))?;
        records.push(record.clone());
        Ok(())
    }
}
