use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use blueprint_session::api::project_dto::{CreateFileDto, CreateProjectDto, FileUpdateDto, MessageDto, ProjectDto, ProjectFileDto};
use blueprint_session::config::SessionConfig;
use blueprint_session::domain::project_service::in_memory_project_service::InMemoryProjectService;
use blueprint_session::domain::project_service::project_service_trait::ProjectService;
use blueprint_session::domain::session::controller::EditorSession;
use blueprint_session::domain::session::open_file::FileType;
use blueprint_session::domain::utils::id::{FileId, ProjectId};
use blueprint_session::error::{Error, Result};

/// In-memory service whose file updates can be slowed down or made to fail.
#[derive(Debug, Clone, Default)]
pub struct MockProjectService {
    pub inner: InMemoryProjectService,
    fail_updates: Arc<AtomicBool>,
    update_delay_ms: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockProjectService {
    pub fn new() -> MockProjectService {
        MockProjectService::default()
    }

    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn set_update_delay(&self, delay: Duration) {
        self.update_delay_ms.store(usize::try_from(delay.as_millis()).unwrap_or(usize::MAX), Ordering::SeqCst);
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Default project seeded with one blueprint per id.
    pub async fn seed_blueprints(&self, ids: &[&str]) -> ProjectId {
        let project = self.inner.get_default_project().await.unwrap();
        for id in ids {
            let file = CreateFileDto {
                id: FileId::new(*id),
                name: id.to_string(),
                file_type: FileType::Blueprint,
                path: format!("/files/blueprints/{}", id),
                content: None,
                thumbnail: None,
            };
            self.inner.create_file(&project.id, file).await.unwrap();
        }
        project.id
    }

    pub async fn content_of(&self, project_id: &ProjectId, file_id: &str) -> Option<serde_json::Value> {
        let project = self.inner.get_project(project_id).await.unwrap();
        project.file(&FileId::new(file_id)).and_then(|file| file.content.clone())
    }
}

#[allow(dead_code)]
pub async fn session_on(service: &MockProjectService, project_id: &ProjectId) -> EditorSession {
    let mut session = EditorSession::new(Arc::new(service.clone()), &SessionConfig::default());
    session.load_project(project_id).await.unwrap();
    session
}

#[async_trait]
impl ProjectService for MockProjectService {
    async fn get_projects(&self) -> Result<Vec<ProjectDto>> {
        self.inner.get_projects().await
    }

    async fn get_default_project(&self) -> Result<ProjectDto> {
        self.inner.get_default_project().await
    }

    async fn get_project(&self, project_id: &ProjectId) -> Result<ProjectDto> {
        self.inner.get_project(project_id).await
    }

    async fn create_project(&self, project: CreateProjectDto) -> Result<ProjectDto> {
        self.inner.create_project(project).await
    }

    async fn update_project(&self, project_id: &ProjectId, name: &str) -> Result<ProjectDto> {
        self.inner.update_project(project_id, name).await
    }

    async fn delete_project(&self, project_id: &ProjectId) -> Result<MessageDto> {
        self.inner.delete_project(project_id).await
    }

    async fn create_file(&self, project_id: &ProjectId, file: CreateFileDto) -> Result<ProjectFileDto> {
        self.inner.create_file(project_id, file).await
    }

    async fn update_file(&self, project_id: &ProjectId, file_id: &FileId, update: FileUpdateDto) -> Result<ProjectFileDto> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.update_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }

        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(Error::ApiError { status: 503, detail: "Service unavailable".to_string() });
        }
        self.inner.update_file(project_id, file_id, update).await
    }

    async fn delete_file(&self, project_id: &ProjectId, file_id: &FileId) -> Result<MessageDto> {
        self.inner.delete_file(project_id, file_id).await
    }
}
