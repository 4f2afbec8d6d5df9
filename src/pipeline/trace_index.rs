//! Bounded, insertion-ordered index of in-flight and completed traces
//!
//! The index pairs a hash map (trace id -> trace) with an explicit FIFO
//! queue of trace ids ordered by first arrival. The queue exists purely for
//! eviction: when a newly registered trace pushes the index past
//! `max_traces`, the queue head is evicted from both structures. Eviction is
//! strict FIFO by first arrival, not LRU: a trace that is still actively
//! receiving messages ages out of the window like any other. That is the
//! bounded-memory tradeoff this index makes, and callers must not "refresh"
//! a trace's position on append.

use super::types::Record;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// All records observed so far for one trace identifier
///
/// `messages` is append-only in arrival order, which is not necessarily
/// timestamp order. `start_time`/`end_time` are maintained incrementally on
/// every append; they are never recomputed by rescanning.
#[derive(Debug, Clone, Serialize)]
pub struct TraceRecord {
    pub trace_id: String,

    /// Records in arrival order
    pub messages: Vec<Record>,

    /// Distinct topics touched, in first-touch order
    pub topics: Vec<String>,

    /// Minimum observed record timestamp (epoch millis)
    pub start_time: i64,

    /// Maximum observed record timestamp (epoch millis)
    pub end_time: i64,
}

impl TraceRecord {
    fn new(trace_id: &str) -> Self {
        Self {
            trace_id: trace_id.to_string(),
            messages: Vec::new(),
            topics: Vec::new(),
            start_time: 0,
            end_time: 0,
        }
    }

    /// Append a record, updating the topic set and time bounds in O(1)
    ///
    /// Private on purpose: `TraceIndex::append_message` is the single
    /// mutation entry point for trace state.
    fn append(&mut self, record: Record) {
        if self.messages.is_empty() {
            self.start_time = record.timestamp;
            self.end_time = record.timestamp;
        } else {
            self.start_time = self.start_time.min(record.timestamp);
            self.end_time = self.end_time.max(record.timestamp);
        }

        if !self.topics.contains(&record.topic) {
            self.topics.push(record.topic.clone());
        }
        self.messages.push(record);
    }

    /// End-to-end duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.end_time - self.start_time) as f64 / 1000.0
    }

    /// Timestamp of the first message (in arrival order) on `topic`
    pub fn first_timestamp_on(&self, topic: &str) -> Option<i64> {
        self.messages
            .iter()
            .find(|m| m.topic == topic)
            .map(|m| m.timestamp)
    }
}

/// Capacity-bounded trace storage with FIFO eviction
#[derive(Debug)]
pub struct TraceIndex {
    traces: HashMap<String, TraceRecord>,

    /// Trace ids by first arrival; head is the eviction candidate
    arrival_order: VecDeque<String>,

    max_traces: usize,
    evicted: u64,
}

impl TraceIndex {
    pub fn new(max_traces: usize) -> Self {
        Self {
            traces: HashMap::new(),
            arrival_order: VecDeque::new(),
            // A zero capacity would evict every trace on creation
            max_traces: max_traces.max(1),
            evicted: 0,
        }
    }

    /// Return the existing trace or register a new one at the FIFO tail
    ///
    /// When registration pushes the index over `max_traces`, the FIFO head
    /// is evicted before returning. The freshly registered trace sits at
    /// the tail and can never be its own eviction victim.
    pub fn get_or_create(&mut self, trace_id: &str) -> &mut TraceRecord {
        if !self.traces.contains_key(trace_id) {
            self.traces
                .insert(trace_id.to_string(), TraceRecord::new(trace_id));
            self.arrival_order.push_back(trace_id.to_string());

            if self.traces.len() > self.max_traces {
                if let Some((evicted_id, _)) = self.evict_oldest() {
                    log::debug!("Evicted trace {} (index at capacity)", evicted_id);
                }
            }
        }

        self.traces
            .get_mut(trace_id)
            .expect("trace registered above")
    }

    /// Single mutation entry point: append `record` to its trace
    pub fn append_message(&mut self, trace_id: &str, record: Record) {
        self.get_or_create(trace_id).append(record);
    }

    /// Remove and return the oldest trace, or `None` when empty
    ///
    /// Used by capacity eviction and by the operator-facing reset.
    pub fn evict_oldest(&mut self) -> Option<(String, TraceRecord)> {
        let oldest = self.arrival_order.pop_front()?;
        let record = self.traces.remove(&oldest)?;
        self.evicted += 1;
        Some((oldest, record))
    }

    /// Read-consistent copy of the current map for statistics scans
    pub fn snapshot(&self) -> HashMap<String, TraceRecord> {
        self.traces.clone()
    }

    pub fn get(&self, trace_id: &str) -> Option<&TraceRecord> {
        self.traces.get(trace_id)
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    pub fn max_traces(&self) -> usize {
        self.max_traces
    }

    /// Total traces evicted over the index's lifetime
    pub fn evicted_count(&self) -> u64 {
        self.evicted
    }
}
