//! Record ingestion - async channel processor feeding the engine
//!
//! Single-writer discipline lives here: exactly one task receives decoded
//! records and pushes them through the engine, one at a time in arrival
//! order. Each record is processed under one lock acquisition so readers
//! taking snapshots never observe partial trace updates.

use super::engine::CorrelationEngine;
use super::sink::SummarySink;
use super::types::Record;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

/// Run the ingestion loop until the record channel closes
///
/// Main loop:
/// 1. Receives decoded records from the consumer collaborator via mpsc
/// 2. Processes each record through the engine (single lock acquisition)
/// 3. Periodically snapshots engine counters and publishes them via `sink`
///
/// On channel close a final summary is published before exiting.
pub async fn start_record_ingestion(
    mut rx: mpsc::Receiver<Record>,
    engine: Arc<Mutex<CorrelationEngine>>,
    sink: Arc<dyn SummarySink>,
    summary_interval_ms: u64,
) {
    log::info!("🚀 Starting record ingestion");
    log::info!("   └─ Summary interval: {}ms", summary_interval_ms);

    let mut summary_timer = interval(Duration::from_millis(summary_interval_ms));
    let mut record_count = 0u64;
    let mut last_log_time = std::time::Instant::now();

    loop {
        tokio::select! {
            maybe_record = rx.recv() => {
                match maybe_record {
                    Some(record) => {
                        {
                            let mut engine_guard = engine.lock().unwrap();
                            engine_guard.process_record(record);
                        }

                        record_count += 1;

                        // Log throughput every 10 seconds
                        if last_log_time.elapsed().as_secs() >= 10 {
                            let records_per_sec =
                                record_count as f64 / last_log_time.elapsed().as_secs_f64();
                            log::info!("📊 Ingestion rate: {:.1} records/sec", records_per_sec);
                            last_log_time = std::time::Instant::now();
                            record_count = 0;
                        }
                    }

                    // Channel closed (consumer shutdown)
                    None => {
                        log::warn!("⚠️  Record channel closed, stopping ingestion");

                        let summary = {
                            let engine_guard = engine.lock().unwrap();
                            engine_guard.summary()
                        };
                        if let Err(e) = sink.publish(summary).await {
                            log::error!("❌ Failed to publish final summary: {}", e);
                        }
                        break;
                    }
                }
            }

            _ = summary_timer.tick() => {
                let summary = {
                    let engine_guard = engine.lock().unwrap();
                    engine_guard.summary()
                };

                if let Err(e) = sink.publish(summary).await {
                    log::error!("❌ Failed to publish engine summary: {}", e);
                }
            }
        }
    }

    log::info!("✅ Record ingestion stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::config::EngineConfig;
    use crate::pipeline::sink::EngineSummary;
    use async_trait::async_trait;

    fn make_record(topic: &str, timestamp: i64, trace_id: Option<&str>) -> Record {
        Record {
            topic: topic.to_string(),
            partition: 0,
            offset: 0,
            key: None,
            timestamp,
            headers: Default::default(),
            payload: serde_json::Value::Null,
            trace_id: trace_id.map(|s| s.to_string()),
        }
    }

    /// Sink that captures every published summary for assertions
    struct CapturingSink {
        published: tokio::sync::Mutex<Vec<EngineSummary>>,
    }

    #[async_trait]
    impl SummarySink for CapturingSink {
        async fn publish(
            &self,
            summary: EngineSummary,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.published.lock().await.push(summary);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_ingestion_processes_records_in_order() {
        let (tx, rx) = mpsc::channel(100);
        let engine = Arc::new(Mutex::new(CorrelationEngine::new(&EngineConfig::default())));
        let sink: Arc<dyn SummarySink> = Arc::new(CapturingSink {
            published: tokio::sync::Mutex::new(Vec::new()),
        });

        let handle = tokio::spawn(start_record_ingestion(
            rx,
            engine.clone(),
            sink,
            60_000, // keep the timer quiet during the test
        ));

        tx.send(make_record("orders", 1_000, Some("t1"))).await.unwrap();
        tx.send(make_record("billing", 2_000, Some("t1"))).await.unwrap();
        tx.send(make_record("audit", 3_000, None)).await.unwrap();

        // Closing the channel drains the loop and triggers the final flush
        drop(tx);
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();

        let engine_guard = engine.lock().unwrap();
        assert_eq!(engine_guard.trace_count(), 1);
        assert_eq!(engine_guard.graph().get_destinations("orders"), vec!["billing"]);
        assert_eq!(engine_guard.untraced_activity("audit").unwrap().total_count, 1);
    }

    #[tokio::test]
    async fn test_final_summary_published_on_channel_close() {
        let (tx, rx) = mpsc::channel(10);
        let engine = Arc::new(Mutex::new(CorrelationEngine::new(&EngineConfig::default())));
        let sink = Arc::new(CapturingSink {
            published: tokio::sync::Mutex::new(Vec::new()),
        });

        let handle = tokio::spawn(start_record_ingestion(
            rx,
            engine.clone(),
            sink.clone(),
            60_000,
        ));

        tx.send(make_record("orders", 1_000, Some("t1"))).await.unwrap();
        drop(tx);
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();

        let published = sink.published.lock().await;
        // At least the startup tick and the final flush
        assert!(!published.is_empty());
        assert_eq!(published.last().unwrap().records_processed, 1);
    }
}
