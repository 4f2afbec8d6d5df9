//! Runtime binary - feeds decoded JSONL records from stdin into the engine
//!
//! The wire consumer and schema decoding live outside this crate; their
//! boundary is a stream of decoded records. This binary reads that stream
//! as JSON lines on stdin, so any upstream consumer can pipe into it:
//!
//!   kafka-decoder --json | topicflow_runtime
//!
//! Environment variables:
//!   TOPICFLOW_MAX_TRACES          - Trace index capacity (default: 1000)
//!   TOPICFLOW_SEED_EDGES          - Preloaded edges, "src:dst,..." (default: empty)
//!   TOPICFLOW_CHANNEL_BUFFER      - Ingestion channel size (default: 10000)
//!   TOPICFLOW_SUMMARY_INTERVAL_MS - Summary publish interval (default: 5000)

use dotenv::dotenv;
use log::{error, info, warn};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use topicflow::pipeline::{
    config::EngineConfig,
    engine::CorrelationEngine,
    ingestion::start_record_ingestion,
    sink::{LogSummarySink, SummarySink},
    types::Record,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize environment and logging
    dotenv().ok();
    env_logger::init();

    let config = EngineConfig::from_env();

    info!("🚀 topicflow runtime");
    info!("   ├─ Max traces: {}", config.max_traces);
    info!("   ├─ Rolling window: {}s", config.rolling_window_secs);
    info!("   ├─ Channel buffer: {} records", config.channel_buffer);
    info!("   ├─ Summary interval: {}ms", config.summary_interval_ms);
    info!("   └─ Seed edges: {}", config.seed_edges.len());

    let engine = Arc::new(Mutex::new(CorrelationEngine::new(&config)));
    let (tx, rx) = mpsc::channel::<Record>(config.channel_buffer);
    let sink: Arc<dyn SummarySink> = Arc::new(LogSummarySink);

    let ingestion_handle = tokio::spawn(start_record_ingestion(
        rx,
        engine.clone(),
        sink,
        config.summary_interval_ms,
    ));

    // Feed decoded records from stdin, one JSON object per line
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut skipped = 0u64;

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<Record>(line) {
                    Ok(record) => {
                        if tx.send(record).await.is_err() {
                            warn!("⚠️  Ingestion task gone, stopping stdin feed");
                            break;
                        }
                    }
                    Err(e) => {
                        skipped += 1;
                        warn!("⚠️  Skipping undecodable record: {}", e);
                    }
                }
            }
            Ok(None) => break, // EOF
            Err(e) => {
                error!("❌ stdin read failed: {}", e);
                break;
            }
        }
    }

    // Close the channel so ingestion drains, flushes, and exits
    drop(tx);
    ingestion_handle.await?;

    let engine_guard = engine.lock().unwrap();
    let summary = engine_guard.summary();
    info!(
        "✅ Shutdown: {} records processed, {} topics, {} edges, {} traces retained, {} lines skipped",
        summary.records_processed,
        summary.topic_count,
        summary.edge_count,
        summary.traces_indexed,
        skipped
    );

    Ok(())
}
