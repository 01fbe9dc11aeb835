use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::utils::id::PinId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinKind {
    /// Control flow.
    Execution,
    /// Value flow.
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Boolean,
    Object,
}

/// A connection point on a node. Connected pins are never checked for type compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub id: PinId,

    #[serde(rename = "type")]
    pub kind: PinKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Pin {
    pub fn execution(id: &str, name: &str) -> Self {
        Pin { id: PinId::new(id), kind: PinKind::Execution, data_type: None, name: name.to_string(), value: None }
    }

    pub fn data(id: &str, data_type: DataType, name: &str) -> Self {
        Pin { id: PinId::new(id), kind: PinKind::Data, data_type: Some(data_type), name: name.to_string(), value: None }
    }

    pub fn is_execution(&self) -> bool {
        self.kind == PinKind::Execution
    }
}
