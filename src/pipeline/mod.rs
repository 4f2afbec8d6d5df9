//! # Topic/trace correlation pipeline
//!
//! In-memory engine that ingests a stream of decoded records and maintains
//! two derived views for dashboard queries:
//! - A directed graph of which topics causally follow which, inferred from
//!   consecutive topics observed within one trace
//! - A bounded index of in-flight and recently completed traces, with
//!   per-topic latency/throughput statistics computed on demand
//!
//! ## Architecture
//!
//! **Key principle:** bounded memory under unbounded arrival.
//!
//! 1. Decoded records arrive from the consumer collaborator (in-memory only)
//! 2. `CorrelationEngine` updates the trace index and topic graph per record
//! 3. The trace index evicts strict-FIFO by first arrival past `max_traces`
//! 4. Statistics and graph queries run over snapshot copies, never blocking
//!    the single writer
//!
//! Nothing is persisted and nothing is retried: every operation is
//! synchronous, in-memory, and reports "no data" through empty/zero results
//! rather than failure signals.
//!
//! ## Module organization
//!
//! - `types` - Decoded record schema (`Record`)
//! - `graph` - Topic graph with adjacency indexes (`TopicGraph`)
//! - `trace_index` - Bounded FIFO trace storage (`TraceIndex`, `TraceRecord`)
//! - `engine` - Single-writer ingestion path (`CorrelationEngine`)
//! - `stats` - Per-topic statistics views (`StatisticsEngine`)
//! - `query` - Read-only facade for the API layer (`QueryService`)
//! - `config` - Environment-variable configuration (`EngineConfig`)
//! - `ingestion` - Async channel processor (`start_record_ingestion`)
//! - `sink` - Periodic summary publication (`SummarySink`)

pub mod config;
pub mod engine;
pub mod graph;
pub mod ingestion;
pub mod query;
pub mod sink;
pub mod stats;
pub mod trace_index;
pub mod types;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::{CorrelationEngine, TopicActivity};
pub use graph::{TopicEdge, TopicGraph};
pub use query::QueryService;
pub use sink::{EngineSummary, LogSummarySink, SummarySink};
pub use stats::{SlowTrace, StatisticsEngine, TopicStatistics};
pub use trace_index::{TraceIndex, TraceRecord};
pub use types::Record;
