//! Signed HTTP adapters for the managed services behind each boundary trait.
//!
//! Each adapter keeps its request/response shaping in pure functions and
//! goes through [`AwsClient::execute`] for signing and transport.

pub mod credentials;
pub mod dynamodb;
pub mod firehose;
pub mod lookout_vision;
pub mod s3;
pub mod sigv4;
pub mod sns;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::Method;
use reqwest::header::HeaderMap;
use tracing::debug;

use lineguard_core::{InspectionError, InspectionResult};

use crate::config::{ConfigError, PipelineConfig};

pub use credentials::AwsCredentials;
pub use dynamodb::DynamoDbRecordStore;
pub use firehose::FirehoseSink;
pub use lookout_vision::LookoutVisionScorer;
pub use s3::S3ObjectStore;
pub use sns::SnsNotifier;

const ERROR_BODY_LIMIT: usize = 256;

/// Where a request goes: scheme plus authority (`host[:port]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: String,
    pub host: String,
}

impl Endpoint {
    pub fn https(host: impl Into<String>) -> Self {
        Self {
            scheme: "https".to_string(),
            host: host.into(),
        }
    }

    /// Parse an override such as `http://localhost:4566`. A bare host means https.
    pub fn parse(url: &str) -> Self {
        let url = url.trim().trim_end_matches('/');
        match url.split_once("://") {
            Some((scheme, host)) => Self {
                scheme: scheme.to_ascii_lowercase(),
                host: host.to_string(),
            },
            None => Self::https(url),
        }
    }

    /// Regional endpoint of a service, e.g. `dynamodb.eu-west-1.amazonaws.com`.
    pub fn regional(prefix: &str, region: &str) -> Self {
        Self::https(format!("{prefix}.{region}.amazonaws.com"))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}://{}{}", self.scheme, self.host, path)
    }
}

/// One outgoing service call, before signing.
#[derive(Debug, Clone)]
pub struct ServiceCall {
    pub method: Method,
    pub endpoint: Endpoint,
    /// Canonical (already encoded) path.
    pub path: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ServiceResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ServiceResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into a dependency error for `service`.
    pub fn error_for_status(self, service: &'static str) -> InspectionResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(InspectionError::dependency(
            service,
            format!("HTTP {}: {}", self.status, truncated_body(&self.body)),
        ))
    }
}

fn truncated_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.chars().count() <= ERROR_BODY_LIMIT {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(ERROR_BODY_LIMIT).collect();
    cut.push_str("...");
    cut
}

/// Shared signing HTTP client.
#[derive(Debug, Clone)]
pub struct AwsClient {
    http: reqwest::Client,
    credentials: Arc<AwsCredentials>,
    region: String,
    endpoint_override: Option<Endpoint>,
}

impl AwsClient {
    pub fn new(
        credentials: AwsCredentials,
        region: impl Into<String>,
        endpoint_override: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            credentials: Arc::new(credentials),
            region: region.into(),
            endpoint_override: endpoint_override.map(Endpoint::parse),
        })
    }

    /// Credentials from the process environment; region, override and timeout from `config`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        Self::new(
            AwsCredentials::from_env()?,
            config.region.clone(),
            config.endpoint_url.as_deref(),
            config.http_timeout,
        )
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn endpoint_override(&self) -> Option<&Endpoint> {
        self.endpoint_override.as_ref()
    }

    /// Endpoint for a regional JSON/query service, honouring the override.
    pub fn service_endpoint(&self, prefix: &str) -> Endpoint {
        self.endpoint_override
            .clone()
            .unwrap_or_else(|| Endpoint::regional(prefix, &self.region))
    }

    /// Sign and send. Transport failures map to `Dependency(service)`; the
    /// status is left for the adapter to judge.
    pub async fn execute(
        &self,
        service: &'static str,
        signing_name: &str,
        call: ServiceCall,
    ) -> InspectionResult<ServiceResponse> {
        let auth = sigv4::sign(
            &self.credentials,
            &self.region,
            signing_name,
            &sigv4::SignableRequest {
                method: call.method.as_str(),
                host: &call.endpoint.host,
                path: &call.path,
                query: "",
                headers: &call.headers,
                payload: &call.body,
            },
            Utc::now(),
        );

        let url = call.endpoint.url(&call.path);
        debug!(service, method = %call.method, url = %url, "sending signed request");

        let mut request = self.http.request(call.method, &url);
        for (name, value) in call.headers.iter().chain(auth.iter()) {
            request = request.header(*name, value.as_str());
        }

        let response = request
            .body(call.body)
            .send()
            .await
            .map_err(|e| InspectionError::dependency(service, format!("request to {url} failed: {e}")))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| InspectionError::dependency(service, format!("reading response failed: {e}")))?
            .to_vec();

        Ok(ServiceResponse { status, headers, body })
    }
}

/// Text between the first `<tag>` and its closing tag.
pub(crate) fn extract_xml_value(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)?;
    Some(xml[start..start + end].to_string())
}
