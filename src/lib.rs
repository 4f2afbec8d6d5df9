//! topicflow - streaming topic/trace correlation engine
//!
//! Ingests decoded event records tagged with a topic and an optional trace
//! identifier, and maintains a topic dependency graph plus a bounded trace
//! index with per-topic statistics. Wire consumption, decoding, and the
//! HTTP/WebSocket surface live in external collaborators; this crate is the
//! correlation-and-aggregation core between them.

pub mod pipeline;

pub use pipeline::{
    CorrelationEngine, EngineConfig, QueryService, Record, TopicStatistics, TraceRecord,
};
