//! On-demand per-topic statistics over a trace index snapshot
//!
//! All three statistics fields come out of a single pass over the snapshot,
//! merged with the untraced-activity counters for the topic. Rates are
//! floats end to end and are never derived from a rounded count.
//!
//! Known characteristic, kept on purpose: `messages_per_minute_total` is
//! measured against the earliest *retained* message, so the elapsed window
//! shrinks as old traces are evicted and the rate drifts toward recent
//! throughput. Callers wanting a stable denominator should use the rolling
//! rate.

use super::engine::TopicActivity;
use super::trace_index::TraceRecord;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// One entry of the slowest-traces ranking
#[derive(Debug, Clone, Serialize)]
pub struct SlowTrace {
    pub trace_id: String,

    /// End-to-end trace duration in seconds
    pub total_duration_seconds: f64,

    /// Seconds from trace start to its first message on the queried topic
    pub time_to_topic_seconds: f64,
}

/// Per-topic statistics served to the dashboard layer
#[derive(Debug, Clone, Serialize)]
pub struct TopicStatistics {
    /// Retained message count / elapsed minutes since the earliest
    /// retained message on this topic
    pub messages_per_minute_total: f64,

    /// Message count within the trailing window / window length in minutes
    pub messages_per_minute_rolling: f64,

    /// Top-N traces touching this topic, slowest first
    pub slowest_traces: Vec<SlowTrace>,
}

impl TopicStatistics {
    fn empty() -> Self {
        Self {
            messages_per_minute_total: 0.0,
            messages_per_minute_rolling: 0.0,
            slowest_traces: Vec::new(),
        }
    }
}

/// Computes statistics views; holds only ranking configuration
#[derive(Debug, Clone)]
pub struct StatisticsEngine {
    slowest_limit: usize,
}

impl StatisticsEngine {
    pub fn new(slowest_limit: usize) -> Self {
        Self { slowest_limit }
    }

    /// Compute all per-topic statistics from one snapshot pass
    ///
    /// `untraced` carries the activity counters for records that had no
    /// trace id; those contribute to the rates but can never appear in the
    /// slowest-traces ranking. A topic with zero retained messages yields
    /// zero rates and an empty ranking, never an error.
    pub fn compute_topic_statistics(
        &self,
        snapshot: &HashMap<String, TraceRecord>,
        untraced: Option<&TopicActivity>,
        topic: &str,
        window_seconds: u64,
        now_ms: i64,
    ) -> TopicStatistics {
        let window_start = now_ms - window_seconds as i64 * 1000;

        let mut total_count: u64 = 0;
        let mut earliest: Option<i64> = None;
        let mut rolling_count: u64 = 0;
        let mut ranked: Vec<SlowTrace> = Vec::new();

        for trace in snapshot.values() {
            let mut first_on_topic: Option<i64> = None;

            for msg in &trace.messages {
                if msg.topic != topic {
                    continue;
                }
                if first_on_topic.is_none() {
                    first_on_topic = Some(msg.timestamp);
                }
                total_count += 1;
                earliest = Some(earliest.map_or(msg.timestamp, |e| e.min(msg.timestamp)));
                if msg.timestamp >= window_start {
                    rolling_count += 1;
                }
            }

            if let Some(first_ts) = first_on_topic {
                ranked.push(SlowTrace {
                    trace_id: trace.trace_id.clone(),
                    total_duration_seconds: trace.duration_seconds(),
                    time_to_topic_seconds: (first_ts - trace.start_time) as f64 / 1000.0,
                });
            }
        }

        if let Some(activity) = untraced {
            total_count += activity.total_count;
            if let Some(e) = activity.earliest {
                earliest = Some(earliest.map_or(e, |cur| cur.min(e)));
            }
            rolling_count += activity.recent.iter().filter(|&&ts| ts >= window_start).count() as u64;
        }

        if total_count == 0 {
            return TopicStatistics::empty();
        }

        // Clamp elapsed time to one second so a same-instant burst stays finite
        let elapsed_ms = earliest.map_or(1_000, |e| (now_ms - e).max(1_000));
        let messages_per_minute_total = total_count as f64 / (elapsed_ms as f64 / 60_000.0);

        let messages_per_minute_rolling = if window_seconds == 0 {
            0.0
        } else {
            rolling_count as f64 / (window_seconds as f64 / 60.0)
        };

        // Slowest first; ties broken by trace id ascending for determinism
        ranked.sort_by(|a, b| {
            b.total_duration_seconds
                .partial_cmp(&a.total_duration_seconds)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.trace_id.cmp(&b.trace_id))
        });
        ranked.truncate(self.slowest_limit);

        TopicStatistics {
            messages_per_minute_total,
            messages_per_minute_rolling,
            slowest_traces: ranked,
        }
    }
}
