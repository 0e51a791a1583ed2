use async_trait::async_trait;
use reqwest::Method;
use tracing::instrument;

use lineguard_core::error::service;
use lineguard_core::{InspectionError, InspectionResult};

use super::sigv4::uri_encode;
use super::{AwsClient, ServiceCall, extract_xml_value};
use crate::alerts::{AlertMessage, Notifier};

const SIGNING_NAME: &str = "sns";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
const API_VERSION: &str = "2010-03-31";
const SUBJECT_LIMIT: usize = 100;

/// Form body of a `Publish` call with one body per protocol.
pub fn publish_form(topic: &str, message: &AlertMessage) -> String {
    let subject: String = message.subject.chars().take(SUBJECT_LIMIT).collect();
    let params = [
        ("Action", "Publish".to_string()),
        ("Version", API_VERSION.to_string()),
        ("TopicArn", topic.to_string()),
        ("Subject", subject),
        ("MessageStructure", "json".to_string()),
        ("Message", message.to_structured_json()),
    ];

    params
        .iter()
        .map(|(k, v)| format!("{k}={}", uri_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn parse_message_id(body: &[u8]) -> InspectionResult<String> {
    extract_xml_value(&String::from_utf8_lossy(body), "MessageId")
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| InspectionError::dependency(service::NOTIFICATION, "response carried no MessageId"))
}

/// Notifier over the SNS `Publish` API.
#[derive(Debug, Clone)]
pub struct SnsNotifier {
    client: AwsClient,
}

impl SnsNotifier {
    pub fn new(client: AwsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    #[instrument(skip_all, fields(topic = %topic, outcome = %message.outcome))]
    async fn publish(&self, topic: &str, message: &AlertMessage) -> InspectionResult<String> {
        let call = ServiceCall {
            method: Method::POST,
            endpoint: self.client.service_endpoint(SIGNING_NAME),
            path: "/".to_string(),
            headers: vec![("content-type", FORM_CONTENT_TYPE.to_string())],
            body: publish_form(topic, message).into_bytes(),
        };

        let response = self
            .client
            .execute(service::NOTIFICATION, SIGNING_NAME, call)
            .await?
            .error_for_status(service::NOTIFICATION)?;

        parse_message_id(&response.body)
    }
}
