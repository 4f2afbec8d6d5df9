//! Directed topic graph derived from observed traffic
//!
//! Edges represent a historically-observed transition from one topic to
//! another within a trace. They are inserted lazily by edge inference (or
//! preloaded from a seed list) and never removed except by an explicit
//! operator reset. Self-edges are legal: retry and cyclic topics produce
//! them.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Directed pair of topic names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicEdge {
    pub source: String,
    pub destination: String,
}

/// Edge collection plus adjacency indexes for O(1) lookups
///
/// Topics are derived, never stored redundantly: the topic list is exactly
/// the union of edge endpoints in first-seen order.
#[derive(Debug, Default)]
pub struct TopicGraph {
    /// Edges in insertion order
    edges: Vec<TopicEdge>,

    /// Set view of the edges for idempotent insertion
    edge_set: HashSet<(String, String)>,

    /// topic -> destinations, in edge-insertion order
    outgoing: HashMap<String, Vec<String>>,

    /// topic -> sources, in edge-insertion order
    incoming: HashMap<String, Vec<String>>,

    /// Every topic appearing as an endpoint, in first-seen order
    topics: Vec<String>,
    topic_set: HashSet<String>,
}

impl TopicGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a directed edge; a no-op when the exact pair already exists
    ///
    /// Any two non-empty topic names are accepted, including
    /// `source == destination`. Topic non-emptiness is enforced upstream by
    /// the decoding collaborator.
    pub fn add_edge(&mut self, source: &str, destination: &str) {
        debug_assert!(
            !source.is_empty() && !destination.is_empty(),
            "topic names are validated upstream"
        );

        let pair = (source.to_string(), destination.to_string());
        if self.edge_set.contains(&pair) {
            return;
        }
        self.edge_set.insert(pair);

        self.edges.push(TopicEdge {
            source: source.to_string(),
            destination: destination.to_string(),
        });
        self.outgoing
            .entry(source.to_string())
            .or_default()
            .push(destination.to_string());
        self.incoming
            .entry(destination.to_string())
            .or_default()
            .push(source.to_string());

        self.note_topic(source);
        self.note_topic(destination);
    }

    /// Topics directly reachable from `topic`, in edge-insertion order
    pub fn get_destinations(&self, topic: &str) -> Vec<String> {
        self.outgoing.get(topic).cloned().unwrap_or_default()
    }

    /// Topics with an edge into `topic`, in edge-insertion order
    pub fn get_sources(&self, topic: &str) -> Vec<String> {
        self.incoming.get(topic).cloned().unwrap_or_default()
    }

    /// Deduplicated union of every edge endpoint, in first-seen order
    pub fn get_all_topics(&self) -> Vec<String> {
        self.topics.clone()
    }

    /// All edges in insertion order
    pub fn edges(&self) -> &[TopicEdge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Drop all edges; used only for explicit operator reset
    pub fn clear(&mut self) {
        self.edges.clear();
        self.edge_set.clear();
        self.outgoing.clear();
        self.incoming.clear();
        self.topics.clear();
        self.topic_set.clear();
    }

    fn note_topic(&mut self, topic: &str) {
        if self.topic_set.insert(topic.to_string()) {
            self.topics.push(topic.to_string());
        }
    }
}
