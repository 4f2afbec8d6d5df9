//! Correlation engine - single-writer ingestion path for decoded records
//!
//! This module provides the `CorrelationEngine` struct that owns the two
//! derived views and keeps them consistent under continuous arrival:
//! 1. `TopicGraph` - directed edges inferred from consecutive topics
//!    observed within one trace
//! 2. `TraceIndex` - bounded trace storage with FIFO eviction
//!
//! ## Architecture
//!
//! ```text
//! Record (decoded upstream)
//!     |
//! CorrelationEngine::process_record()
//!     |-- trace_id present -> TraceIndex::append_message()
//!     |                       + edge inference -> TopicGraph::add_edge()
//!     `-- trace_id absent  -> per-topic activity counters only
//! ```
//!
//! Exactly one ingestion task mutates the engine, one record at a time in
//! arrival order. Each `process_record` call (including any eviction it
//! triggers) runs under a single lock acquisition, so readers taking
//! snapshots never observe a trace mid-mutation.

use super::config::EngineConfig;
use super::graph::TopicGraph;
use super::sink::EngineSummary;
use super::trace_index::{TraceIndex, TraceRecord};
use super::types::Record;
use std::collections::{HashMap, VecDeque};

/// Per-topic activity accumulator for records without a trace identifier
///
/// Untraced records attach to no trace and infer no edges, but they still
/// count toward a topic's throughput statistics. `recent` holds timestamps
/// in arrival order for rolling-rate queries and is pruned past the largest
/// configured window so memory stays bounded.
#[derive(Debug, Clone, Default)]
pub struct TopicActivity {
    /// Total untraced records seen on this topic
    pub total_count: u64,

    /// Smallest observed timestamp (epoch millis)
    pub earliest: Option<i64>,

    /// Recent timestamps, arrival order; pruned against the newest arrival
    pub recent: VecDeque<i64>,
}

impl TopicActivity {
    fn observe(&mut self, timestamp: i64, max_window_ms: i64) {
        self.total_count += 1;
        self.earliest = Some(self.earliest.map_or(timestamp, |e| e.min(timestamp)));
        self.recent.push_back(timestamp);

        // Arrival order is not timestamp order; pruning stops at the first
        // in-window entry, so this bounds memory without reordering
        let cutoff = timestamp - max_window_ms;
        while let Some(&front) = self.recent.front() {
            if front < cutoff {
                self.recent.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Single owner of the topic graph, trace index, and activity counters
///
/// The graph and index are constructor-initialized and only ever reachable
/// through this aggregate; there is no hidden shared state.
pub struct CorrelationEngine {
    graph: TopicGraph,
    traces: TraceIndex,

    /// Per-topic counters for records carrying no trace id
    untraced: HashMap<String, TopicActivity>,

    /// Pruning bound for untraced activity, milliseconds
    max_window_ms: i64,

    records_processed: u64,

    /// Timestamp function (for testing with mock time), epoch millis
    now_fn: Box<dyn Fn() -> i64 + Send + Sync>,
}

impl CorrelationEngine {
    /// Create an engine with the system clock, preloading any seed edges
    pub fn new(config: &EngineConfig) -> Self {
        Self::new_with_timestamp_fn(config, Box::new(|| chrono::Utc::now().timestamp_millis()))
    }

    /// Create an engine with a custom timestamp function
    ///
    /// Used for testing with deterministic timestamps.
    pub fn new_with_timestamp_fn(
        config: &EngineConfig,
        now_fn: Box<dyn Fn() -> i64 + Send + Sync>,
    ) -> Self {
        let mut graph = TopicGraph::new();
        for (source, destination) in &config.seed_edges {
            graph.add_edge(source, destination);
        }

        Self {
            graph,
            traces: TraceIndex::new(config.max_traces),
            untraced: HashMap::new(),
            max_window_ms: config.max_window_secs as i64 * 1000,
            records_processed: 0,
            now_fn,
        }
    }

    /// Process one decoded record through the engine
    ///
    /// A missing trace id is the expected common case, not an error: the
    /// record updates the topic's activity counters and nothing else. With
    /// a trace id the record is appended to its trace, and once the trace
    /// holds at least two messages an edge is inferred from the previous
    /// message's topic (arrival order, not timestamp order) to this one.
    pub fn process_record(&mut self, record: Record) {
        debug_assert!(!record.topic.is_empty(), "topic names are validated upstream");
        self.records_processed += 1;

        let trace_id = match record.trace_id.clone() {
            Some(id) => id,
            None => {
                let max_window_ms = self.max_window_ms;
                self.untraced
                    .entry(record.topic.clone())
                    .or_default()
                    .observe(record.timestamp, max_window_ms);
                return;
            }
        };

        self.traces.append_message(&trace_id, record);

        // Edge inference over the last two arrivals of this trace
        if let Some(trace) = self.traces.get(&trace_id) {
            let n = trace.messages.len();
            if n >= 2 {
                let source = trace.messages[n - 2].topic.clone();
                let destination = trace.messages[n - 1].topic.clone();
                self.graph.add_edge(&source, &destination);
            }
        }
    }

    /// Operator-facing reset: drop all edges and drain the trace index
    pub fn reset(&mut self) {
        self.graph.clear();
        while self.traces.evict_oldest().is_some() {}
        self.untraced.clear();
        log::info!("Engine reset: graph cleared, trace index drained");
    }

    pub fn graph(&self) -> &TopicGraph {
        &self.graph
    }

    pub fn trace(&self, trace_id: &str) -> Option<&TraceRecord> {
        self.traces.get(trace_id)
    }

    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    /// Read-consistent copy of the trace map for statistics scans
    pub fn trace_snapshot(&self) -> HashMap<String, TraceRecord> {
        self.traces.snapshot()
    }

    /// Untraced-activity counters for one topic, if any were seen
    pub fn untraced_activity(&self, topic: &str) -> Option<&TopicActivity> {
        self.untraced.get(topic)
    }

    /// Current time in epoch millis, via the injected clock
    pub fn now(&self) -> i64 {
        (self.now_fn)()
    }

    /// Counters snapshot for the periodic summary task
    pub fn summary(&self) -> EngineSummary {
        EngineSummary {
            generated_at: self.now(),
            records_processed: self.records_processed,
            traces_indexed: self.traces.len(),
            traces_evicted: self.traces.evicted_count(),
            topic_count: self.graph.topic_count(),
            edge_count: self.graph.edge_count(),
        }
    }
}
