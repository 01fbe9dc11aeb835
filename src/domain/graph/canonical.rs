//! Canonical form of a graph, used to decide whether in-memory state differs from the
//! last persisted content.
//!
//! Normalizing goes through the typed model, so render-only fields a canvas attaches to
//! nodes and edges (`selected`, `dragging`, `measured`, ...) are dropped. Serialization
//! writes object keys in sorted order regardless of how the input was ordered, so two
//! equal graphs always produce identical bytes. Array order is kept: node order is the
//! canvas stacking order.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::graph::edge::Edge;
use crate::domain::graph::node::Node;
use crate::domain::graph::snapshot::GraphSnapshot;
use crate::error::Result;

pub fn canonical_value(snapshot: &GraphSnapshot) -> Result<Value> {
    Ok(serde_json::to_value(snapshot)?)
}

pub fn canonical_string(snapshot: &GraphSnapshot) -> Result<String> {
    canonicalize_json(&canonical_value(snapshot)?)
}

/// Re-parses a snapshot through the wire model.
pub fn normalize(snapshot: &GraphSnapshot) -> Result<GraphSnapshot> {
    Ok(serde_json::from_value(canonical_value(snapshot)?)?)
}

/// Normalizes a raw `{nodes, edges}` JSON value as received from a canvas or the backend.
pub fn normalize_value(raw: &Value) -> Result<Value> {
    let snapshot: GraphSnapshot = serde_json::from_value(raw.clone())?;
    canonical_value(&snapshot)
}

/// Compact JSON with object keys sorted at every depth. `serde_json::Map` is ordered by
/// key unless `preserve_order` is enabled, which this crate does not do.
pub fn canonicalize_json(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Graph read out of persisted file content, plus the number of stored entries that
/// could not be read into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentGraph {
    pub snapshot: GraphSnapshot,
    pub rejected: usize,
}

impl ContentGraph {
    pub fn is_complete(&self) -> bool {
        self.rejected == 0
    }
}

/// Reads persisted content entry by entry. Entries that do not fit the wire model are
/// skipped and counted; the rest of the graph is kept.
///
/// Content without both a `nodes` and an `edges` array is an empty graph. Whatever the
/// lone array held counts as rejected.
pub fn read_content(content: Option<&Value>) -> ContentGraph {
    let Some(content) = content else {
        return ContentGraph::default();
    };

    let (Some(nodes), Some(edges)) = (content.get("nodes"), content.get("edges")) else {
        let rejected = content.get("nodes").or_else(|| content.get("edges")).map_or(0, entry_count);
        log::warn!("Persisted content has no nodes/edges pair, treating it as an empty graph.");
        return ContentGraph { snapshot: GraphSnapshot::default(), rejected };
    };

    let (nodes, bad_nodes) = read_entries::<Node>(nodes, "node");
    let (edges, bad_edges) = read_entries::<Edge>(edges, "edge");

    ContentGraph { snapshot: GraphSnapshot::new(nodes, edges), rejected: bad_nodes + bad_edges }
}

/// Reads the graph out of persisted file content, dropping unreadable entries.
pub fn snapshot_from_content(content: Option<&Value>) -> GraphSnapshot {
    read_content(content).snapshot
}

fn read_entries<T: DeserializeOwned>(raw: &Value, kind: &str) -> (Vec<T>, usize) {
    let Some(entries) = raw.as_array() else {
        log::warn!("Persisted {} list is not an array, skipping it.", kind);
        return (Vec::new(), entry_count(raw));
    };

    let mut parsed = Vec::with_capacity(entries.len());
    let mut rejected = 0;
    for (index, entry) in entries.iter().enumerate() {
        match serde_json::from_value::<T>(entry.clone()) {
            Ok(item) => parsed.push(item),
            Err(e) => {
                log::warn!("Skipping persisted {} #{} ({}).", kind, index, e);
                rejected += 1;
            }
        }
    }
    (parsed, rejected)
}

fn entry_count(raw: &Value) -> usize {
    match raw {
        Value::Null => 0,
        Value::Array(entries) => entries.len(),
        _ => 1,
    }
}
