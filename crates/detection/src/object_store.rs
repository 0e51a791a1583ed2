use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lineguard_core::error::service;
use lineguard_core::{InspectionError, InspectionResult};

/// Location of an object: container (bucket) plus key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self, InspectionError> {
        let bucket = bucket.into();
        let key = key.into();
        if bucket.trim().is_empty() {
            return Err(InspectionError::missing("Bucket"));
        }
        if key.trim().is_empty() {
            return Err(InspectionError::missing("Key"));
        }
        Ok(Self { bucket, key })
    }

    /// Parse `s3://<bucket>/<key>`.
    pub fn parse_url(url: &str) -> Result<Self, InspectionError> {
        let rest = url
            .strip_prefix("s3://")
            .ok_or_else(|| InspectionError::input(format!("not an s3:// url: {url}")))?;
        let (bucket, key) = rest
            .split_once('/')
            .ok_or_else(|| InspectionError::input(format!("url has no object key: {url}")))?;
        Self::new(bucket, key)
    }

    /// The `s3://<bucket>/<key>` form recorded as a detection's image url.
    pub fn url(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

impl core::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.url())
    }
}

/// Object body plus the attributes attached at upload time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
    /// User metadata. Keys are lower-case (`cameraid`, `assemblylineid`, `imageid`).
    pub metadata: HashMap<String, String>,
}

impl StoredObject {
    pub fn new(body: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_type: content_type.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Non-empty metadata value for `key` (matched case-insensitively).
    pub fn required_metadata(&self, key: &str) -> Result<&str, InspectionError> {
        let value = self
            .metadata
            .get(key)
            .or_else(|| {
                self.metadata
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .ok_or_else(|| InspectionError::input(format!("object metadata is missing '{key}'")))?;

        if value.trim().is_empty() {
            return Err(InspectionError::input(format!("object metadata '{key}' is empty")));
        }
        Ok(value)
    }
}

/// Read-only object store boundary.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch body, content type and metadata. A missing object is a dependency error.
    async fn get_object(&self, object: &ObjectRef) -> InspectionResult<StoredObject>;
}

/// In-memory object store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ObjectRef, StoredObject>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, object: ObjectRef, stored: StoredObject) -> InspectionResult<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| InspectionError::dependency(service::OBJECT_STORE, "lock poisoned"))?;
        objects.insert(object, stored);
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get_object(&self, object: &ObjectRef) -> InspectionResult<StoredObject> {
        let objects = self
            .objects
            .read()
            .map_err(|_| InspectionError::dependency(service::OBJECT_STORE, "lock poisoned"))?;

        objects.get(object).cloned().ok_or_else(|| {
            InspectionError::dependency(service::OBJECT_STORE, format!("{object} not found"))
        })
    }
}
