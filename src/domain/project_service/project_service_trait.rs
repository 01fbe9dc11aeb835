use async_trait::async_trait;

use crate::api::project_dto::{CreateFileDto, CreateProjectDto, FileUpdateDto, MessageDto, ProjectDto, ProjectFileDto};
use crate::domain::utils::id::{FileId, ProjectId};
use crate::error::Result;

/// Backend that owns projects and their files.
///
/// Every call is all-or-nothing from the caller's point of view: an `Err` means nothing
/// was changed that the caller needs to account for.
#[async_trait]
pub trait ProjectService: std::fmt::Debug + Send + Sync {
    async fn get_projects(&self) -> Result<Vec<ProjectDto>>;

    /// The user's default project, created on first request.
    async fn get_default_project(&self) -> Result<ProjectDto>;

    async fn get_project(&self, project_id: &ProjectId) -> Result<ProjectDto>;

    async fn create_project(&self, project: CreateProjectDto) -> Result<ProjectDto>;

    async fn update_project(&self, project_id: &ProjectId, name: &str) -> Result<ProjectDto>;

    async fn delete_project(&self, project_id: &ProjectId) -> Result<MessageDto>;

    async fn create_file(&self, project_id: &ProjectId, file: CreateFileDto) -> Result<ProjectFileDto>;

    async fn update_file(&self, project_id: &ProjectId, file_id: &FileId, update: FileUpdateDto) -> Result<ProjectFileDto>;

    async fn delete_file(&self, project_id: &ProjectId, file_id: &FileId) -> Result<MessageDto>;
}
