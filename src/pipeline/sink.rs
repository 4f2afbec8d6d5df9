//! Summary sink trait for periodic engine health publication
//!
//! The ingestion loop snapshots engine counters on an interval and hands
//! them to a `SummarySink`. The shipped implementation logs the summary as
//! a JSON line; the API collaborator can provide its own sink to push the
//! same payload over a websocket or metrics endpoint.

use async_trait::async_trait;
use serde::Serialize;

/// Counters snapshot taken under one engine lock acquisition
#[derive(Debug, Clone, Serialize)]
pub struct EngineSummary {
    /// When the snapshot was taken, epoch millis
    pub generated_at: i64,

    /// Records processed since engine construction
    pub records_processed: u64,

    /// Traces currently retained in the index
    pub traces_indexed: usize,

    /// Traces evicted over the engine's lifetime
    pub traces_evicted: u64,

    /// Distinct topics known to the graph
    pub topic_count: usize,

    /// Directed edges in the graph
    pub edge_count: usize,
}

/// Destination for periodic engine summaries
#[async_trait]
pub trait SummarySink: Send + Sync {
    async fn publish(
        &self,
        summary: EngineSummary,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Sink that emits each summary as a JSON log line
pub struct LogSummarySink;

#[async_trait]
impl SummarySink for LogSummarySink {
    async fn publish(
        &self,
        summary: EngineSummary,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let line = serde_json::to_string(&summary)?;
        log::info!("📊 Engine summary: {}", line);
        Ok(())
    }
}
