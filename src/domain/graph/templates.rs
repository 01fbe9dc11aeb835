use std::str::FromStr;

use serde_json::json;
use uuid::Uuid;

use crate::domain::graph::node::{Node, NodeData, NodeType, Position};
use crate::domain::graph::pin::{DataType, Pin};
use crate::domain::utils::id::NodeId;
use crate::error::Error;

/// Where the toolbar drops a new node when no position is given.
pub const DEFAULT_DROP_POSITION: Position = Position { x: 200.0, y: 200.0 };

/// Stock nodes offered by the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Event,
    Function,
    Variable,
    Endpoint,
    Default,
}

impl FromStr for NodeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "event" => Ok(NodeKind::Event),
            "function" => Ok(NodeKind::Function),
            "variable" => Ok(NodeKind::Variable),
            "endpoint" => Ok(NodeKind::Endpoint),
            "default" | "node" => Ok(NodeKind::Default),
            other => Err(Error::ConfigError(format!("unknown node kind '{}'", other))),
        }
    }
}

pub fn fresh_node_id() -> NodeId {
    NodeId::new(format!("node_{}", Uuid::new_v4().simple()))
}

impl NodeKind {
    pub fn build(self, position: Position) -> Node {
        Node::new(fresh_node_id(), position, self.data())
    }

    fn data(self) -> NodeData {
        match self {
            NodeKind::Event => {
                let mut data = NodeData::new("New Event", NodeType::Event);
                data.outputs = vec![Pin::execution("exec-out", "Exec")];
                data
            }
            NodeKind::Function => {
                let mut data = NodeData::new("New Function", NodeType::Function);
                data.inputs = vec![Pin::execution("exec-in", "Exec"), Pin::data("input-1", DataType::String, "Input")];
                data.outputs = vec![Pin::execution("exec-out", "Exec")];
                data.extra.insert("textValue".to_string(), json!(""));
                data
            }
            NodeKind::Variable => {
                let mut data = NodeData::new("New Variable", NodeType::Variable);
                data.outputs = vec![Pin::data("value-out", DataType::String, "Value")];
                data.properties.insert("value".to_string(), json!("New Value"));
                data.extra.insert("variableName".to_string(), json!("New Variable"));
                data
            }
            NodeKind::Endpoint => {
                let mut data = NodeData::new("API Endpoint", NodeType::Function);
                data.inputs = vec![Pin::execution("exec-in", "Exec"), Pin::data("params-in", DataType::Object, "Params")];
                data.outputs = vec![Pin::execution("exec-out", "Exec"), Pin::data("response-out", DataType::Object, "Response")];
                data.extra.insert("textValue".to_string(), json!(""));
                data
            }
            NodeKind::Default => {
                let mut data = NodeData::new("New Node", NodeType::Function);
                data.inputs = vec![Pin::execution("exec-in", "Exec")];
                data.outputs = vec![Pin::execution("exec-out", "Exec")];
                data.extra.insert("textValue".to_string(), json!(""));
                data
            }
        }
    }
}
