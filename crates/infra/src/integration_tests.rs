//! Integration tests for the full inspection pipeline over in-memory collaborators.
//!
//! Tests: ObjectStore → DetectionInvoker → RecordWriter → AlertRouter,
//! then RecordStore change stream → ChangeCaptureTransformer → AnalyticsSink.
//!
//! Verifies:
//! - Provenance and confidence survive every hop unchanged
//! - Alert routing reads the persisted record, not the raw verdict
//! - Analytics rows carry the stored timestamp and its calendar breakdown

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, TimeDelta};

    use lineguard_core::{AlertOutcome, Confidence};
    use lineguard_detection::{
        AnomalyScore, DetectionInvoker, FixedScorer, InMemoryObjectStore, ModelRef, ObjectRef, StoredObject,
    };

    use crate::alerts::{AlertRouter, InMemoryNotifier};
    use crate::change_capture::{ChangeCaptureTransformer, InMemoryAnalyticsSink};
    use crate::record_store::{InMemoryRecordStore, RecordWriter, SteppingClock};

    const REGION: &str = "eu-west-1";
    const STREAM: &str = "detections-analytics";

    struct Pipeline {
        objects: Arc<InMemoryObjectStore>,
        store: Arc<InMemoryRecordStore>,
        notifier: Arc<InMemoryNotifier>,
        sink: Arc<InMemoryAnalyticsSink>,
        invoker: DetectionInvoker,
        writer: RecordWriter,
        router: AlertRouter,
        transformer: ChangeCaptureTransformer,
    }

    fn setup(verdict: (bool, &str)) -> Pipeline {
        let objects = Arc::new(InMemoryObjectStore::new());
        let scorer = Arc::new(FixedScorer::new(AnomalyScore {
            is_anomalous: verdict.0,
            confidence: Confidence::parse(verdict.1).unwrap(),
        }));
        let store = Arc::new(InMemoryRecordStore::new(REGION));
        let notifier = Arc::new(InMemoryNotifier::new());
        let sink = Arc::new(InMemoryAnalyticsSink::new());

        let start = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_micro_opt(14, 22, 10, 123_456)
            .unwrap();
        let clock = Arc::new(SteppingClock::new(start, TimeDelta::seconds(61)));

        Pipeline {
            invoker: DetectionInvoker::new(objects.clone(), scorer, ModelRef::new("line-inspection", "3")),
            writer: RecordWriter::with_clock(store.clone(), clock),
            router: AlertRouter::new(notifier.clone(), "defect-alerts", Confidence::parse("0.50").unwrap()),
            transformer: ChangeCaptureTransformer::new(sink.clone(), STREAM),
            objects,
            store,
            notifier,
            sink,
        }
    }

    fn capture(p: &Pipeline, key: &str, image_id: &str) -> ObjectRef {
        let object = ObjectRef::new("captures", key).unwrap();
        p.objects
            .put(
                object.clone(),
                StoredObject::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg")
                    .with_metadata("cameraid", "cam-01")
                    .with_metadata("assemblylineid", "line-a")
                    .with_metadata("imageid", image_id),
            )
            .unwrap();
        object
    }

    #[tokio::test]
    async fn low_confidence_defect_flows_to_alert_and_analytics() {
        let p = setup((true, "0.40"));
        let object = capture(&p, "line-a/img-0001.jpg", "img-0001");

        let result = p.invoker.detect(&object).await.unwrap();
        let record = p.writer.write(result).await.unwrap();
        let dispatch = p.router.route(&record).await.unwrap();

        assert_eq!(dispatch.outcome, AlertOutcome::LowConfidenceAnomaly);
        assert_eq!(p.notifier.count(), 1);

        let report = p.transformer.process(&p.store.change_batch()).await;
        assert_eq!(report.summary(), "Successfully processed 1 records.");

        let rows = p.sink.records(STREAM).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].image_url, "s3://captures/line-a/img-0001.jpg");
        assert_eq!(rows[0].date_time, "2024-03-05T14:22:10.123456");
        assert_eq!(rows[0].confidence, "0.40");
        assert_eq!((rows[0].hour, rows[0].minute), (14, 22));
        assert_eq!(rows[0].region, REGION);
    }

    #[tokio::test]
    async fn confident_normal_is_recorded_but_not_alerted() {
        let p = setup((false, "0.90"));
        let object = capture(&p, "line-a/img-0002.jpg", "img-0002");

        let record = p.writer.write(p.invoker.detect(&object).await.unwrap()).await.unwrap();
        let dispatch = p.router.route(&record).await.unwrap();

        assert_eq!(dispatch.outcome, AlertOutcome::Suppressed);
        assert_eq!(p.notifier.count(), 0);
        assert_eq!(p.store.len(), 1);

        let report = p.transformer.process(&p.store.change_batch()).await;
        assert_eq!(report.appended, 1);
    }

    #[tokio::test]
    async fn repeated_writes_produce_distinct_analytics_rows() {
        let p = setup((true, "0.95"));
        let object = capture(&p, "line-a/img-0003.jpg", "img-0003");
        let result = p.invoker.detect(&object).await.unwrap();

        p.writer.write(result.clone()).await.unwrap();
        p.writer.write(result).await.unwrap();

        let report = p.transformer.process(&p.store.change_batch()).await;
        assert_eq!(report.appended, 2);

        let rows = p.sink.records(STREAM).unwrap();
        assert_ne!(rows[0].date_time, rows[1].date_time);
        assert_eq!((rows[0].minute, rows[1].minute), (22, 23));
    }
}
