use serde::{Deserialize, Serialize};

use crate::domain::utils::id::{EdgeId, NodeId, PinId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default)]
    pub is_execution: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,

    /// Null when the edge was drawn between nodes without handles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<PinId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<PinId>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub render_type: Option<String>,

    #[serde(default)]
    pub data: EdgeData,
}

impl Edge {
    /// Builds the edge the canvas creates for a new connection. A connection is an
    /// execution wire as soon as either handle names an execution pin.
    pub fn connecting(source: NodeId, source_handle: PinId, target: NodeId, target_handle: PinId) -> Self {
        let id = EdgeId::new(format!("xy-edge__{}{}-{}{}", source, source_handle, target, target_handle));
        let is_execution = source_handle.as_str().contains("exec") || target_handle.as_str().contains("exec");

        Edge {
            id,
            source,
            target,
            source_handle: Some(source_handle),
            target_handle: Some(target_handle),
            render_type: Some(super::node::DEFAULT_RENDER_TYPE.to_string()),
            data: EdgeData { is_execution },
        }
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }

    /// Same endpoints and handles, regardless of id.
    pub fn same_connection(&self, other: &Edge) -> bool {
        self.source == other.source
            && self.target == other.target
            && self.source_handle == other.source_handle
            && self.target_handle == other.target_handle
    }
}
