//! Read-only query facade for the API/presentation layer
//!
//! Wraps the shared engine handle and answers dashboard queries without
//! blocking ingestion: each call holds the engine lock only long enough to
//! copy the state it needs, then computes unlocked. "Not found" surfaces as
//! `None` or empty collections; translating that into external responses is
//! the API collaborator's job.

use super::config::EngineConfig;
use super::engine::CorrelationEngine;
use super::graph::TopicEdge;
use super::stats::{StatisticsEngine, TopicStatistics};
use super::trace_index::TraceRecord;
use std::sync::{Arc, Mutex};

pub struct QueryService {
    engine: Arc<Mutex<CorrelationEngine>>,
    stats: StatisticsEngine,
    default_window_secs: u64,
}

impl QueryService {
    pub fn new(engine: Arc<Mutex<CorrelationEngine>>, config: &EngineConfig) -> Self {
        Self {
            engine,
            stats: StatisticsEngine::new(config.slowest_traces_limit),
            default_window_secs: config.rolling_window_secs,
        }
    }

    /// All known topics in first-seen order
    pub fn topics(&self) -> Vec<String> {
        self.engine.lock().unwrap().graph().get_all_topics()
    }

    /// All edges as (source, destination) pairs in insertion order
    pub fn edges(&self) -> Vec<TopicEdge> {
        self.engine.lock().unwrap().graph().edges().to_vec()
    }

    /// Topics directly downstream of `topic`
    pub fn destinations(&self, topic: &str) -> Vec<String> {
        self.engine.lock().unwrap().graph().get_destinations(topic)
    }

    /// Topics directly upstream of `topic`
    pub fn sources(&self, topic: &str) -> Vec<String> {
        self.engine.lock().unwrap().graph().get_sources(topic)
    }

    /// Full trace by id, or `None` if never seen or already evicted
    pub fn trace(&self, trace_id: &str) -> Option<TraceRecord> {
        self.engine.lock().unwrap().trace(trace_id).cloned()
    }

    /// Per-topic statistics over the current snapshot
    ///
    /// `window_seconds` defaults to the configured rolling window.
    pub fn topic_statistics(&self, topic: &str, window_seconds: Option<u64>) -> TopicStatistics {
        let (snapshot, untraced, now) = {
            let guard = self.engine.lock().unwrap();
            (
                guard.trace_snapshot(),
                guard.untraced_activity(topic).cloned(),
                guard.now(),
            )
        };

        self.stats.compute_topic_statistics(
            &snapshot,
            untraced.as_ref(),
            topic,
            window_seconds.unwrap_or(self.default_window_secs),
            now,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::Record;

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

    fn make_service() -> (Arc<Mutex<CorrelationEngine>>, QueryService) {
        let config = EngineConfig::default();
        let engine = Arc::new(Mutex::new(CorrelationEngine::new_with_timestamp_fn(
            &config,
            Box::new(|| 1_000_000),
        )));
        let service = QueryService::new(engine.clone(), &config);
        (engine, service)
    }

    #[test]
    fn test_graph_queries_through_facade() {
        let (engine, service) = make_service();
        {
            let mut guard = engine.lock().unwrap();
            guard.process_record(make_record("orders", 1_000, Some("t1")));
            guard.process_record(make_record("billing", 2_000, Some("t1")));
        }

        assert_eq!(service.topics(), vec!["orders", "billing"]);
        assert_eq!(service.destinations("orders"), vec!["billing"]);
        assert_eq!(service.sources("billing"), vec!["orders"]);

        let edges = service.edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "orders");
        assert_eq!(edges[0].destination, "billing");
    }

    #[test]
    fn test_trace_lookup() {
        let (engine, service) = make_service();
        {
            let mut guard = engine.lock().unwrap();
            guard.process_record(make_record("orders", 1_000, Some("t1")));
        }

        let trace = service.trace("t1").unwrap();
        assert_eq!(trace.messages.len(), 1);
        assert!(service.trace("unknown").is_none());
    }

    #[test]
    fn test_statistics_for_unknown_topic_are_empty() {
        let (_engine, service) = make_service();
        let stats = service.topic_statistics("ghost", None);

        assert_eq!(stats.messages_per_minute_total, 0.0);
        assert_eq!(stats.messages_per_minute_rolling, 0.0);
        assert!(stats.slowest_traces.is_empty());
    }

    #[test]
    fn test_statistics_use_engine_clock() {
        let (engine, service) = make_service();
        {
            let mut guard = engine.lock().unwrap();
            // Engine clock is pinned at 1_000_000ms; these fall in a 60s window
            guard.process_record(make_record("orders", 970_000, Some("t1")));
            guard.process_record(make_record("orders", 990_000, Some("t2")));
        }

        let stats = service.topic_statistics("orders", None);
        assert!((stats.messages_per_minute_rolling - 2.0).abs() < f64::EPSILON);
    }
}
