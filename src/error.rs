use thiserror::Error;

use crate::domain::utils::id::{EdgeId, FileId, NodeId, ProjectId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Request to the project service failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Project service rejected the request ({status}): {detail}")]
    ApiError { status: u16, detail: String },

    #[error("Authentication required")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("{0:?} is not open in the editor")]
    FileNotOpen(FileId),

    #[error("No file is active in the editor")]
    NoActiveFile,

    #[error("{0:?} does not hold a graph")]
    NotAGraphFile(FileId),

    #[error("A save is already in flight for {0:?}")]
    SaveInProgress(FileId),

    #[error("Persisted content of {0:?} has {1} unreadable graph entries, refusing to overwrite it")]
    UnreadableContent(FileId, usize),

    #[error("No project is loaded in the session")]
    NoProjectLoaded,

    #[error("Project {0:?} does not contain {1:?}")]
    FileNotInProject(ProjectId, FileId),

    #[error("Graph contains no node {0:?}")]
    UnknownNode(NodeId),

    #[error("Graph already contains node {0:?}")]
    DuplicateNode(NodeId),

    #[error("Graph contains no edge {0:?}")]
    UnknownEdge(EdgeId),
}

impl Error {
    /// Errors that come from talking to the project service rather than from local state.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(
            self,
            Error::HttpError(_) | Error::ApiError { .. } | Error::Unauthorized | Error::NotFound(_) | Error::Conflict(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
