use crate::domain::graph::edge::Edge;
use crate::domain::graph::node::{Node, Position};
use crate::domain::graph::snapshot::GraphSnapshot;
use crate::domain::store::selection::Selection;
use crate::domain::store::viewport::Viewport;
use crate::domain::utils::id::{EdgeId, NodeId, PinId};
use crate::error::{Error, Result};

/// Node positions from drags land on this grid.
pub const GRID_SIZE: f64 = 20.0;

/// Live state of the file currently rendered on the canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasState {
    pub snapshot: GraphSnapshot,
    pub viewport: Viewport,
    pub selection: Selection,
}

/// Everything the canvas can do to the graph of the active file.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphAction {
    AddNode(Node),
    UpdateNode(Node),
    MoveNode { id: NodeId, position: Position },
    RemoveNode(NodeId),
    Connect { source: NodeId, source_handle: PinId, target: NodeId, target_handle: PinId },
    RemoveEdge(EdgeId),
    SetViewport(Viewport),
    Select(Selection),
    ClearSelection,
    ReplaceGraph(GraphSnapshot),
}

impl GraphAction {
    /// Whether the action can change persisted content (as opposed to view state).
    pub fn changes_graph(&self) -> bool {
        !matches!(self, GraphAction::SetViewport(_) | GraphAction::Select(_) | GraphAction::ClearSelection)
    }
}

/// Applies `action` to `state` and returns the resulting state; `state` is left as is.
///
/// Removing a node removes every edge attached to it, and connections must join two
/// existing nodes, so a snapshot never gains a dangling edge through this function.
/// The selection is pruned to ids that still exist.
pub fn reduce(state: &CanvasState, action: GraphAction) -> Result<CanvasState> {
    let mut next = state.clone();

    match action {
        GraphAction::AddNode(node) => {
            if next.snapshot.contains_node(&node.id) {
                return Err(Error::DuplicateNode(node.id));
            }
            next.snapshot.nodes.push(node);
        }
        GraphAction::UpdateNode(node) => {
            let slot = next.snapshot.node_mut(&node.id).ok_or_else(|| Error::UnknownNode(node.id.clone()))?;
            *slot = node;
        }
        GraphAction::MoveNode { id, position } => {
            let node = next.snapshot.node_mut(&id).ok_or_else(|| Error::UnknownNode(id.clone()))?;
            node.position = position.snapped(GRID_SIZE);
        }
        GraphAction::RemoveNode(id) => {
            if !next.snapshot.contains_node(&id) {
                return Err(Error::UnknownNode(id));
            }
            next.snapshot.nodes.retain(|node| node.id != id);
            next.snapshot.edges.retain(|edge| !edge.touches(&id));
        }
        GraphAction::Connect { source, source_handle, target, target_handle } => {
            for endpoint in [&source, &target] {
                if !next.snapshot.contains_node(endpoint) {
                    return Err(Error::UnknownNode(endpoint.clone()));
                }
            }

            let edge = Edge::connecting(source, source_handle, target, target_handle);
            if !next.snapshot.edges.iter().any(|existing| existing.same_connection(&edge)) {
                next.snapshot.edges.push(edge);
            }
        }
        GraphAction::RemoveEdge(id) => {
            if !next.snapshot.contains_edge(&id) {
                return Err(Error::UnknownEdge(id));
            }
            next.snapshot.edges.retain(|edge| edge.id != id);
        }
        GraphAction::SetViewport(viewport) => next.viewport = viewport,
        GraphAction::Select(selection) => next.selection = selection,
        GraphAction::ClearSelection => next.selection = Selection::default(),
        GraphAction::ReplaceGraph(snapshot) => next.snapshot = snapshot,
    }

    next.selection.retain_existing(&next.snapshot);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::node::{NodeData, NodeType};

    fn node(id: &str) -> Node {
        Node::new(NodeId::new(id), Position::new(0.0, 0.0), NodeData::new(id, NodeType::Function))
    }

    fn connect(source: &str, target: &str) -> GraphAction {
        GraphAction::Connect {
            source: NodeId::new(source),
            source_handle: PinId::new("exec-out"),
            target: NodeId::new(target),
            target_handle: PinId::new("exec-in"),
        }
    }

    fn two_connected_nodes() -> CanvasState {
        let state = reduce(&CanvasState::default(), GraphAction::AddNode(node("a"))).unwrap();
        let state = reduce(&state, GraphAction::AddNode(node("b"))).unwrap();
        reduce(&state, connect("a", "b")).unwrap()
    }

    #[test]
    fn removing_a_node_removes_its_edges_and_selection() {
        let state = two_connected_nodes();
        let edge_id = state.snapshot.edges[0].id.clone();
        let state = reduce(&state, GraphAction::Select(Selection::new(vec![NodeId::new("a")], vec![edge_id]))).unwrap();

        let state = reduce(&state, GraphAction::RemoveNode(NodeId::new("a"))).unwrap();

        assert!(state.snapshot.edges.is_empty());
        assert!(state.selection.is_empty());
        assert!(state.snapshot.dangling_edges().is_empty());
    }

    #[test]
    fn connecting_twice_keeps_one_edge() {
        let state = two_connected_nodes();
        let state = reduce(&state, connect("a", "b")).unwrap();

        assert_eq!(state.snapshot.edges.len(), 1);
        assert!(state.snapshot.edges[0].data.is_execution);
    }

    #[test]
    fn connecting_to_a_missing_node_is_rejected() {
        let state = two_connected_nodes();
        let result = reduce(&state, connect("a", "ghost"));

        assert!(matches!(result, Err(Error::UnknownNode(id)) if id == NodeId::new("ghost")));
    }

    #[test]
    fn moves_snap_to_the_grid() {
        let state = two_connected_nodes();
        let state = reduce(&state, GraphAction::MoveNode { id: NodeId::new("b"), position: Position::new(133.0, 47.0) }).unwrap();

        assert_eq!(state.snapshot.node(&NodeId::new("b")).unwrap().position, Position::new(140.0, 40.0));
    }

    #[test]
    fn failed_actions_leave_the_input_untouched() {
        let state = two_connected_nodes();
        let before = state.clone();

        assert!(reduce(&state, GraphAction::AddNode(node("a"))).is_err());
        assert!(reduce(&state, GraphAction::RemoveEdge(EdgeId::new("nope"))).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn view_actions_do_not_count_as_graph_changes() {
        assert!(!GraphAction::SetViewport(Viewport::default()).changes_graph());
        assert!(!GraphAction::ClearSelection.changes_graph());
        assert!(GraphAction::RemoveNode(NodeId::new("a")).changes_graph());
    }
}
