//! Core record types shared across the correlation pipeline

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single decoded record delivered by the stream consumer
///
/// Records arrive already decoded and validated; this crate never sees raw
/// bytes. The optional `trace_id` is extracted upstream from a propagation
/// header (e.g. `traceparent`) and links records into a causal trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Topic the record was consumed from
    pub topic: String,

    /// Partition within the topic
    pub partition: i32,

    /// Offset within the partition
    pub offset: i64,

    /// Record key, if any
    #[serde(default)]
    pub key: Option<String>,

    /// Broker-assigned timestamp, epoch milliseconds
    pub timestamp: i64,

    /// Record headers (already stringified upstream)
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Decoded payload as a structured value (scalar/array/map)
    #[serde(default)]
    pub payload: serde_json::Value,

    /// Propagated trace identifier, absent for untraced traffic
    #[serde(default)]
    pub trace_id: Option<String>,
}
