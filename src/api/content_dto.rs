use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::timestamp::saved_at;
use crate::domain::graph::edge::Edge;
use crate::domain::graph::node::Node;
use crate::domain::graph::snapshot::GraphSnapshot;
use crate::error::Result;

pub const CONTENT_VERSION: &str = "1.0.0";

/// Persisted content of a graph file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphContentDto {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub version: String,
    pub saved_at: String,
}

impl GraphContentDto {
    pub fn capture(snapshot: &GraphSnapshot, at: DateTime<Utc>) -> Self {
        GraphContentDto {
            nodes: snapshot.nodes.clone(),
            edges: snapshot.edges.clone(),
            version: CONTENT_VERSION.to_string(),
            saved_at: saved_at(&at),
        }
    }

    pub fn empty(at: DateTime<Utc>) -> Self {
        Self::capture(&GraphSnapshot::default(), at)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::new(self.nodes.clone(), self.edges.clone())
    }
}
