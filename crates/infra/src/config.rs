//! Pipeline configuration, read once at start-up from environment variables.

use std::time::Duration;

use thiserror::Error;

use lineguard_core::Confidence;

pub mod vars {
    pub const PROJECT_NAME: &str = "LFV_PROJECT_NAME";
    pub const MODEL_VERSION: &str = "LFV_MODEL_VERSION";
    pub const TARGET_ARN: &str = "TARGET_ARN";
    pub const CONFIDENCE_THRESHOLD: &str = "CONFIDENCE_THRESHOLD";
    pub const DELIVERY_STREAM_NAME: &str = "DELIVERY_STREAM_NAME";
    pub const REGION: &str = "REGION";
    pub const TABLE_NAME: &str = "DYNAMODB_TABLE_NAME";
    pub const ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";
    pub const HTTP_TIMEOUT_SECS: &str = "LINEGUARD_HTTP_TIMEOUT_SECS";
}

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("http client setup failed: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub project_name: String,
    pub model_version: String,
    /// Notification topic id.
    pub target_arn: String,
    pub confidence_threshold: Confidence,
    pub delivery_stream_name: String,
    pub region: String,
    pub table_name: String,
    pub endpoint_url: Option<String>,
    pub http_timeout: Duration,
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| -> Result<String, ConfigError> {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let optional = |var: &'static str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let threshold_text = required(vars::CONFIDENCE_THRESHOLD)?;
        let confidence_threshold =
            Confidence::parse(&threshold_text).map_err(|e| ConfigError::Invalid {
                var: vars::CONFIDENCE_THRESHOLD,
                value: threshold_text.clone(),
                reason: e.to_string(),
            })?;

        let http_timeout = match optional(vars::HTTP_TIMEOUT_SECS) {
            Some(text) => match text.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: vars::HTTP_TIMEOUT_SECS,
                        value: text,
                        reason: "expected a positive number of seconds".to_string(),
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            project_name: required(vars::PROJECT_NAME)?,
            model_version: required(vars::MODEL_VERSION)?,
            target_arn: required(vars::TARGET_ARN)?,
            confidence_threshold,
            delivery_stream_name: required(vars::DELIVERY_STREAM_NAME)?,
            region: required(vars::REGION)?,
            table_name: required(vars::TABLE_NAME)?,
            endpoint_url: optional(vars::ENDPOINT_URL).map(|u| u.trim_end_matches('/').to_string()),
            http_timeout,
        })
    }
}
