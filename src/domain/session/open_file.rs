use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::project_dto::ProjectFileDto;
use crate::domain::utils::id::FileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Widget,
    Component,
    Image,
    Icon,
    Blueprint,
    Database,
    Endpoint,
    Queue,
    Job,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Widget => "widget",
            FileType::Component => "component",
            FileType::Image => "image",
            FileType::Icon => "icon",
            FileType::Blueprint => "blueprint",
            FileType::Database => "database",
            FileType::Endpoint => "endpoint",
            FileType::Queue => "queue",
            FileType::Job => "job",
        }
    }

    /// File types edited on the node-graph canvas.
    pub fn is_graph(self) -> bool {
        matches!(self, FileType::Blueprint | FileType::Widget | FileType::Component)
    }
}

/// A file with live editor state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenFile {
    pub id: FileId,
    pub name: String,

    #[serde(rename = "type")]
    pub file_type: FileType,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub is_modified: bool,

    /// Last persisted content.
    #[serde(default)]
    pub content: Option<Value>,
}

impl OpenFile {
    pub fn new(id: impl Into<FileId>, name: impl Into<String>, file_type: FileType) -> Self {
        OpenFile { id: id.into(), name: name.into(), file_type, path: None, is_modified: false, content: None }
    }

    pub fn with_content(mut self, content: Value) -> Self {
        self.content = Some(content);
        self
    }
}

impl From<&ProjectFileDto> for OpenFile {
    fn from(file: &ProjectFileDto) -> Self {
        OpenFile {
            id: file.id.clone(),
            name: file.name.clone(),
            file_type: file.file_type,
            path: Some(file.path.clone()),
            is_modified: false,
            content: file.content.clone(),
        }
    }
}
