use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::graph::edge::Edge;
use crate::domain::graph::node::Node;
use crate::domain::utils::id::{EdgeId, NodeId};

/// The `{nodes, edges}` state of one open file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        GraphSnapshot { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| &node.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.iter().any(|edge| &edge.id == id)
    }

    pub fn node_ids(&self) -> HashSet<&NodeId> {
        self.nodes.iter().map(|node| &node.id).collect()
    }

    pub fn edge_ids(&self) -> HashSet<&EdgeId> {
        self.edges.iter().map(|edge| &edge.id).collect()
    }

    /// Edges whose source or target is not a node of this snapshot.
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        let nodes = self.node_ids();
        self.edges.iter().filter(|edge| !nodes.contains(&edge.source) || !nodes.contains(&edge.target)).collect()
    }

    /// Removes dangling edges and returns their ids.
    pub fn prune_dangling_edges(&mut self) -> Vec<EdgeId> {
        let nodes: HashSet<NodeId> = self.nodes.iter().map(|node| node.id.clone()).collect();
        let mut removed = Vec::new();

        self.edges.retain(|edge| {
            let keep = nodes.contains(&edge.source) && nodes.contains(&edge.target);
            if !keep {
                removed.push(edge.id.clone());
            }
            keep
        });

        removed
    }
}
