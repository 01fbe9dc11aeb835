use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::graph::pin::Pin;
use crate::domain::utils::id::NodeId;

pub const DEFAULT_RENDER_TYPE: &str = "custom";

fn default_render_type() -> String {
    DEFAULT_RENDER_TYPE.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Rounds both coordinates to the nearest multiple of `grid`.
    pub fn snapped(self, grid: f64) -> Self {
        Position { x: (self.x / grid).round() * grid, y: (self.y / grid).round() * grid }
    }
}

/// Value of `data.nodeType`. Kinds this editor has no palette entry for are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Event,
    Function,
    Variable,
    Other(String),
}

impl From<String> for NodeType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "event" => NodeType::Event,
            "function" => NodeType::Function,
            "variable" => NodeType::Variable,
            _ => NodeType::Other(raw),
        }
    }
}

impl From<NodeType> for String {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Event => "event".to_string(),
            NodeType::Function => "function".to_string(),
            NodeType::Variable => "variable".to_string(),
            NodeType::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,

    #[serde(default)]
    pub inputs: Vec<Pin>,

    #[serde(default)]
    pub outputs: Vec<Pin>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,

    /// Free-form editor data (`textValue`, `variableName`, ...), kept sorted.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl NodeData {
    pub fn new(label: impl Into<String>, node_type: NodeType) -> Self {
        NodeData {
            label: label.into(),
            node_type: Some(node_type),
            inputs: Vec::new(),
            outputs: Vec::new(),
            properties: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn pin(&self, id: &str) -> Option<&Pin> {
        self.inputs.iter().chain(self.outputs.iter()).find(|pin| pin.id.as_str() == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    /// Render type tag understood by the canvas.
    #[serde(rename = "type", default = "default_render_type")]
    pub render_type: String,

    pub position: Position,
    pub data: NodeData,
}

impl Node {
    pub fn new(id: NodeId, position: Position, data: NodeData) -> Self {
        Node { id, render_type: default_render_type(), position, data }
    }
}
