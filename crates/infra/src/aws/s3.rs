use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use tracing::instrument;

use lineguard_core::error::service;
use lineguard_core::{InspectionError, InspectionResult};
use lineguard_detection::{ObjectRef, ObjectStore, StoredObject};

use super::sigv4::{hex_sha256, uri_encode_path};
use super::{AwsClient, Endpoint, ServiceCall};

const METADATA_PREFIX: &str = "x-amz-meta-";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Endpoint and canonical path for an object.
///
/// Virtual-hosted style against the regional endpoint; path style when an
/// endpoint override is configured.
pub fn object_location(object: &ObjectRef, region: &str, endpoint_override: Option<&Endpoint>) -> (Endpoint, String) {
    let key = uri_encode_path(&object.key);
    match endpoint_override {
        Some(endpoint) => (endpoint.clone(), format!("/{}/{key}", object.bucket)),
        None => (
            Endpoint::https(format!("{}.s3.{region}.amazonaws.com", object.bucket)),
            format!("/{key}"),
        ),
    }
}

/// Build a [`StoredObject`] from a GetObject response.
pub fn stored_object(headers: &HeaderMap, body: Vec<u8>) -> StoredObject {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    headers
        .iter()
        .filter_map(|(name, value)| {
            let key = name.as_str().strip_prefix(METADATA_PREFIX)?;
            Some((key, value.to_str().ok()?))
        })
        .fold(StoredObject::new(body, content_type), |object, (k, v)| object.with_metadata(k, v))
}

/// Object store over the S3 GetObject API.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: AwsClient,
}

impl S3ObjectStore {
    pub fn new(client: AwsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip_all, fields(bucket = %object.bucket, key = %object.key))]
    async fn get_object(&self, object: &ObjectRef) -> InspectionResult<StoredObject> {
        let (endpoint, path) = object_location(object, self.client.region(), self.client.endpoint_override());
        let call = ServiceCall {
            method: Method::GET,
            endpoint,
            path,
            headers: vec![("x-amz-content-sha256", hex_sha256(b""))],
            body: Vec::new(),
        };

        let response = self.client.execute(service::OBJECT_STORE, "s3", call).await?;
        if response.status == 404 {
            return Err(InspectionError::dependency(
                service::OBJECT_STORE,
                format!("{} not found", object.url()),
            ));
        }
        let response = response.error_for_status(service::OBJECT_STORE)?;

        Ok(stored_object(&response.headers, response.body))
    }
}
