use std::sync::Arc;

use tracing::info;

use lineguard_detection::{AnomalyScore, DetectionInvoker, FixedScorer, InMemoryObjectStore, ModelRef};
use lineguard_infra::alerts::{AlertRouter, InMemoryNotifier};
use lineguard_infra::aws::{
    AwsClient, DynamoDbRecordStore, FirehoseSink, LookoutVisionScorer, S3ObjectStore, SnsNotifier,
};
use lineguard_infra::change_capture::{ChangeCaptureTransformer, InMemoryAnalyticsSink};
use lineguard_infra::config::{ConfigError, PipelineConfig};
use lineguard_infra::record_store::{InMemoryRecordStore, RecordWriter};

/// The four pipeline stages, each holding its collaborators as trait objects.
#[derive(Clone)]
pub struct AppServices {
    pub invoker: DetectionInvoker,
    pub writer: RecordWriter,
    pub router: AlertRouter,
    pub transformer: ChangeCaptureTransformer,
}

/// Handles on the in-memory collaborators behind [`memory_services`] wiring.
#[derive(Clone)]
pub struct MemoryBackends {
    pub objects: Arc<InMemoryObjectStore>,
    pub scorer: Arc<FixedScorer>,
    pub records: Arc<InMemoryRecordStore>,
    pub notifier: Arc<InMemoryNotifier>,
    pub analytics: Arc<InMemoryAnalyticsSink>,
}

fn model(config: &PipelineConfig) -> ModelRef {
    ModelRef::new(config.project_name.clone(), config.model_version.clone())
}

/// Wire the stages against the signed AWS adapters.
pub fn build_services(config: &PipelineConfig) -> Result<AppServices, ConfigError> {
    info!(
        region = %config.region,
        endpoint = ?config.endpoint_url,
        "wiring pipeline services"
    );
    let client = AwsClient::from_config(config)?;

    Ok(AppServices {
        invoker: DetectionInvoker::new(
            Arc::new(S3ObjectStore::new(client.clone())),
            Arc::new(LookoutVisionScorer::new(client.clone())),
            model(config),
        ),
        writer: RecordWriter::new(Arc::new(DynamoDbRecordStore::new(
            client.clone(),
            config.table_name.clone(),
        ))),
        router: AlertRouter::new(
            Arc::new(SnsNotifier::new(client.clone())),
            config.target_arn.clone(),
            config.confidence_threshold,
        ),
        transformer: ChangeCaptureTransformer::new(
            Arc::new(FirehoseSink::new(client)),
            config.delivery_stream_name.clone(),
        ),
    })
}

/// In-memory wiring for tests and embedding; every image scores as `verdict`.
///
/// The object store starts empty. Seed it through [`MemoryBackends::objects`].
pub fn memory_services(config: &PipelineConfig, verdict: AnomalyScore) -> (AppServices, MemoryBackends) {
    let backends = MemoryBackends {
        objects: Arc::new(InMemoryObjectStore::new()),
        scorer: Arc::new(FixedScorer::new(verdict)),
        records: Arc::new(InMemoryRecordStore::new(config.region.clone())),
        notifier: Arc::new(InMemoryNotifier::new()),
        analytics: Arc::new(InMemoryAnalyticsSink::new()),
    };

    let services = AppServices {
        invoker: DetectionInvoker::new(backends.objects.clone(), backends.scorer.clone(), model(config)),
        writer: RecordWriter::new(backends.records.clone()),
        router: AlertRouter::new(
            backends.notifier.clone(),
            config.target_arn.clone(),
            config.confidence_threshold,
        ),
        transformer: ChangeCaptureTransformer::new(
            backends.analytics.clone(),
            config.delivery_stream_name.clone(),
        ),
    };

    (services, backends)
}
