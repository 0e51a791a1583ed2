use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use lineguard_core::error::service;
use lineguard_core::{AnalyticsRecord, InspectionError, InspectionResult};

/// Append-only analytics delivery boundary.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Append one framed payload to `stream`; returns the sink-assigned record id.
    async fn put_record(&self, stream: &str, data: Vec<u8>) -> InspectionResult<String>;
}

#[derive(Debug, Default)]
struct SinkState {
    streams: HashMap<String, Vec<Vec<u8>>>,
    puts: usize,
    fail_on: Vec<usize>,
}

/// In-memory analytics sink for tests/dev.
///
/// Failures can be scheduled by put attempt number (1-based, counting every attempt).
#[derive(Debug, Default)]
pub struct InMemoryAnalyticsSink {
    state: Mutex<SinkState>,
}

impl InMemoryAnalyticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the `attempt`-th put (1-based).
    pub fn fail_on_put(&self, attempt: usize) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_on.push(attempt);
        }
    }

    pub fn payloads(&self, stream: &str) -> Vec<Vec<u8>> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.streams.get(stream).cloned())
            .unwrap_or_default()
    }

    /// Decode every accepted payload of `stream`.
    pub fn records(&self, stream: &str) -> InspectionResult<Vec<AnalyticsRecord>> {
        self.payloads(stream)
            .iter()
            .map(|bytes| {
                serde_json::from_slice(bytes)
                    .map_err(|e| InspectionError::input(format!("undecodable analytics payload: {e}")))
            })
            .collect()
    }

    pub fn attempts(&self) -> usize {
        self.state.lock().map(|s| s.puts).unwrap_or(0)
    }
}

#[async_trait]
impl AnalyticsSink for InMemoryAnalyticsSink {
    async fn put_record(&self, stream: &str, data: Vec<u8>) -> InspectionResult<String> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| InspectionError::dependency(service::ANALYTICS_SINK, "lock poisoned"))?;

        state.puts += 1;
        let attempt = state.puts;
        if state.fail_on.contains(&attempt) {
            return Err(InspectionError::dependency(
                service::ANALYTICS_SINK,
                format!("put {attempt} to {stream} rejected"),
            ));
        }

        state.streams.entry(stream.to_string()).or_default().push(data);
        Ok(Uuid::now_v7().simple().to_string())
    }
}
