use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::session::open_file::FileType;
use crate::domain::utils::id::{FileId, ProjectId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDto {
    pub id: ProjectId,
    pub name: String,
    pub user_id: i64,

    #[serde(with = "crate::api::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::api::timestamp")]
    pub updated_at: DateTime<Utc>,

    /// Only filled by the single-project endpoints.
    #[serde(default)]
    pub files: Vec<ProjectFileDto>,
}

impl ProjectDto {
    pub fn file(&self, id: &FileId) -> Option<&ProjectFileDto> {
        self.files.iter().find(|file| &file.id == id)
    }

    pub fn file_mut(&mut self, id: &FileId) -> Option<&mut ProjectFileDto> {
        self.files.iter_mut().find(|file| &file.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFileDto {
    pub id: FileId,
    pub name: String,

    #[serde(rename = "type")]
    pub file_type: FileType,

    pub path: String,

    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub thumbnail: Option<String>,

    pub project_id: ProjectId,

    #[serde(with = "crate::api::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::api::timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProjectDto {
    pub id: ProjectId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFileDto {
    pub id: FileId,
    pub name: String,

    #[serde(rename = "type")]
    pub file_type: FileType,

    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Partial update of a file; `None` fields are left untouched by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileUpdateDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl FileUpdateDto {
    pub fn content(content: Value) -> Self {
        FileUpdateDto { content: Some(content), ..Default::default() }
    }

    pub fn rename(name: impl Into<String>) -> Self {
        FileUpdateDto { name: Some(name.into()), ..Default::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

/// Error body of the project service. `detail` is a string for domain errors and a
/// list of field errors for validation failures.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDto {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ApiErrorDto {
    pub fn message(&self) -> String {
        match &self.detail {
            Some(Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => "API request failed".to_string(),
        }
    }
}
