use crate::domain::graph::node::Position;
use crate::domain::graph::templates::NodeKind;
use crate::domain::session::canvas::GraphAction;
use crate::domain::utils::id::{FileId, NodeId};
use crate::error::Error;

/// Commands issued by the toolbar, tab bar, and keyboard shortcuts.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Save the active file.
    Save,
    SaveFile(FileId),
    SaveAll,
    AddNode { kind: NodeKind, position: Option<Position> },
    Apply(GraphAction),
    Switch(FileId),
    Close(FileId),
    Flush,
}

#[derive(Debug)]
pub enum CommandOutcome {
    Done,
    NodeAdded(NodeId),
    Saved { saved: Vec<FileId>, failed: Vec<(FileId, Error)> },
}
