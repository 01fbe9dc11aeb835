pub mod keyed_store;
pub mod selection;
pub mod viewport;

use crate::domain::graph::snapshot::GraphSnapshot;
use crate::domain::store::keyed_store::KeyedStore;
use crate::domain::store::selection::Selection;
use crate::domain::store::viewport::Viewport;
use crate::domain::utils::id::FileId;

pub type GraphStore = KeyedStore<GraphSnapshot>;
pub type ViewportStore = KeyedStore<Viewport>;
pub type SelectionStore = KeyedStore<Selection>;

/// The three per-file stores, kept consistent with each other.
#[derive(Debug, Default)]
pub struct EditorStores {
    graphs: GraphStore,
    viewports: ViewportStore,
    selections: SelectionStore,
}

impl EditorStores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self, file_id: &FileId) -> Option<&GraphSnapshot> {
        self.graphs.get(file_id)
    }

    pub fn viewport(&self, file_id: &FileId) -> Option<&Viewport> {
        self.viewports.get(file_id)
    }

    pub fn selection(&self, file_id: &FileId) -> Option<&Selection> {
        self.selections.get(file_id)
    }

    /// Replaces the graph and re-prunes any stored selection against it.
    pub fn set_graph(&mut self, file_id: FileId, snapshot: GraphSnapshot) {
        if let Some(selection) = self.selections.get_mut(&file_id) {
            selection.retain_existing(&snapshot);
        }
        self.graphs.set(file_id, snapshot);
    }

    pub fn set_viewport(&mut self, file_id: FileId, viewport: Viewport) {
        self.viewports.set(file_id, viewport);
    }

    /// Stores the selection, keeping only ids present in the file's stored graph.
    pub fn set_selection(&mut self, file_id: FileId, mut selection: Selection) {
        match self.graphs.get(&file_id) {
            Some(snapshot) => selection.retain_existing(snapshot),
            None => selection = Selection::default(),
        }
        self.selections.set(file_id, selection);
    }

    /// Writes all three entries for one file.
    pub fn store(&mut self, file_id: &FileId, snapshot: &GraphSnapshot, viewport: Viewport, selection: &Selection) {
        self.set_graph(file_id.clone(), snapshot.clone());
        self.set_viewport(file_id.clone(), viewport);
        self.set_selection(file_id.clone(), selection.clone());
    }

    /// Drops every entry held for `file_id`.
    pub fn remove_all(&mut self, file_id: &FileId) {
        self.graphs.remove(file_id);
        self.viewports.remove(file_id);
        self.selections.remove(file_id);
    }

    pub fn holds_any(&self, file_id: &FileId) -> bool {
        self.graphs.contains(file_id) || self.viewports.contains(file_id) || self.selections.contains(file_id)
    }

    pub fn file_count(&self) -> usize {
        let mut ids: Vec<&FileId> = self.graphs.keys().chain(self.viewports.keys()).chain(self.selections.keys()).collect();
        ids.sort();
        ids.dedup();
        ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::node::{Node, NodeData, NodeType, Position};
    use crate::domain::utils::id::NodeId;

    fn graph_with(ids: &[&str]) -> GraphSnapshot {
        let nodes = ids
            .iter()
            .map(|id| Node::new(NodeId::new(*id), Position::default(), NodeData::new(*id, NodeType::Function)))
            .collect();
        GraphSnapshot::new(nodes, Vec::new())
    }

    #[test]
    fn selection_never_outlives_its_nodes() {
        let mut stores = EditorStores::new();
        let file = FileId::new("bp");

        stores.set_graph(file.clone(), graph_with(&["a", "b"]));
        stores.set_selection(file.clone(), Selection::new(vec![NodeId::new("a"), NodeId::new("b"), NodeId::new("x")], vec![]));
        assert_eq!(stores.selection(&file).unwrap().selected_node_ids, vec![NodeId::new("a"), NodeId::new("b")]);

        stores.set_graph(file.clone(), graph_with(&["b"]));
        assert_eq!(stores.selection(&file).unwrap().selected_node_ids, vec![NodeId::new("b")]);
    }

    #[test]
    fn remove_all_clears_every_store() {
        let mut stores = EditorStores::new();
        let file = FileId::new("bp");

        stores.store(&file, &graph_with(&["a"]), Viewport::new(10.0, 20.0, 1.5), &Selection::default());
        assert!(stores.holds_any(&file));
        assert_eq!(stores.file_count(), 1);

        stores.remove_all(&file);
        assert!(!stores.holds_any(&file));
        assert_eq!(stores.file_count(), 0);
    }
}
