use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use lineguard_core::InspectionError;

use crate::change::ChangeEvent;

/// A batch of change events as delivered by the record store's change stream.
///
/// Entries stay raw JSON until iterated so one malformed entry cannot prevent the
/// rest of the batch from decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeBatch {
    #[serde(rename = "Records", default)]
    records: Vec<JsonValue>,
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: impl IntoIterator<Item = ChangeEvent>) -> Self {
        let mut batch = Self::new();
        for event in events {
            batch.push(&event);
        }
        batch
    }

    pub fn push(&mut self, event: &ChangeEvent) {
        // ChangeEvent only holds strings, numbers and maps; serialization cannot fail.
        if let Ok(value) = serde_json::to_value(event) {
            self.records.push(value);
        }
    }

    /// Append an entry verbatim (used to model malformed deliveries).
    pub fn push_raw(&mut self, value: JsonValue) {
        self.records.push(value);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn raw(&self) -> &[JsonValue] {
        &self.records
    }

    /// Decode each entry independently, in delivery order.
    pub fn events(&self) -> impl Iterator<Item = Result<ChangeEvent, InspectionError>> + '_ {
        self.records.iter().map(|raw| ChangeEvent::from_json(raw.clone()))
    }
}
