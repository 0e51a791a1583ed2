use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use lineguard_core::error::service;
use lineguard_core::{InspectionError, InspectionResult};

use super::message::AlertMessage;

/// Notification service boundary.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publish to `topic`; returns the service-assigned message id.
    async fn publish(&self, topic: &str, message: &AlertMessage) -> InspectionResult<String>;
}

/// A message accepted by [`InMemoryNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedAlert {
    pub topic: String,
    pub message_id: String,
    pub message: AlertMessage,
}

/// In-memory notifier for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryNotifier {
    published: Mutex<Vec<PublishedAlert>>,
    failing: AtomicBool,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail with a dependency error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn published(&self) -> Vec<PublishedAlert> {
        self.published.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.published.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn publish(&self, topic: &str, message: &AlertMessage) -> InspectionResult<String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(InspectionError::dependency(
                service::NOTIFICATION,
                format!("publish to {topic} rejected"),
            ));
        }

        let message_id = Uuid::now_v7().to_string();
        self.published
            .lock()
            .map_err(|_| InspectionError::dependency(service::NOTIFICATION, "lock poisoned"))?
            .push(PublishedAlert {
                topic: topic.to_string(),
                message_id: message_id.clone(),
                message: message.clone(),
            });
        Ok(message_id)
    }
}
