use serde::{Deserialize, Serialize};

use crate::domain::graph::snapshot::GraphSnapshot;
use crate::domain::utils::id::{EdgeId, NodeId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub selected_node_ids: Vec<NodeId>,
    pub selected_edge_ids: Vec<EdgeId>,
}

impl Selection {
    pub fn new(selected_node_ids: Vec<NodeId>, selected_edge_ids: Vec<EdgeId>) -> Self {
        let mut selection = Selection { selected_node_ids, selected_edge_ids };
        selection.dedup();
        selection
    }

    pub fn is_empty(&self) -> bool {
        self.selected_node_ids.is_empty() && self.selected_edge_ids.is_empty()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.selected_node_ids.contains(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.selected_edge_ids.contains(id)
    }

    /// Drops every id that no longer names a node or edge of `snapshot`.
    pub fn retain_existing(&mut self, snapshot: &GraphSnapshot) {
        let nodes = snapshot.node_ids();
        let edges = snapshot.edge_ids();
        self.selected_node_ids.retain(|id| nodes.contains(id));
        self.selected_edge_ids.retain(|id| edges.contains(id));
    }

    pub fn is_subset_of(&self, snapshot: &GraphSnapshot) -> bool {
        self.selected_node_ids.iter().all(|id| snapshot.contains_node(id))
            && self.selected_edge_ids.iter().all(|id| snapshot.contains_edge(id))
    }

    fn dedup(&mut self) {
        let mut seen_nodes = Vec::with_capacity(self.selected_node_ids.len());
        self.selected_node_ids.retain(|id| {
            if seen_nodes.contains(id) {
                return false;
            }
            seen_nodes.push(id.clone());
            true
        });

        let mut seen_edges = Vec::with_capacity(self.selected_edge_ids.len());
        self.selected_edge_ids.retain(|id| {
            if seen_edges.contains(id) {
                return false;
            }
            seen_edges.push(id.clone());
            true
        });
    }
}
