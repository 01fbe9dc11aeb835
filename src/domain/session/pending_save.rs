use std::time::Instant;

use serde_json::Value;

use crate::api::project_dto::{FileUpdateDto, ProjectFileDto};
use crate::domain::project_service::project_service_trait::ProjectService;
use crate::domain::utils::id::{FileId, ProjectId};
use crate::error::Result;

/// A save captured from the session. Owns everything the request needs, so the
/// session can keep changing (or close the file) while the request is in flight.
#[derive(Debug, Clone)]
pub struct PendingSave {
    pub ticket: u64,
    pub project_id: ProjectId,
    pub file_id: FileId,
    pub content: Value,
    pub node_count: usize,
    pub edge_count: usize,
    pub started_at: Instant,
}

#[derive(Debug)]
pub struct SaveOutcome {
    pub pending: PendingSave,
    pub result: Result<ProjectFileDto>,
}

impl PendingSave {
    pub async fn execute(self, service: &dyn ProjectService) -> SaveOutcome {
        let update = FileUpdateDto::content(self.content.clone());
        let result = service.update_file(&self.project_id, &self.file_id, update).await;
        SaveOutcome { pending: self, result }
    }
}
