use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::api::project_dto::{CreateFileDto, CreateProjectDto, FileUpdateDto, MessageDto, ProjectDto, ProjectFileDto};
use crate::domain::project_service::project_service_trait::ProjectService;
use crate::domain::utils::id::{FileId, ProjectId};
use crate::error::{Error, Result};
use crate::loader::parser::parse_json_file;

pub const DEFAULT_USER_ID: i64 = 1;
pub const DEFAULT_PROJECT_NAME: &str = "My Widget Project";

/// Project service kept in process memory, with the same semantics as the REST
/// backend: unknown ids are `NotFound`, duplicate ids are `Conflict`, and partial
/// file updates only touch the fields they carry.
#[derive(Debug, Clone)]
pub struct InMemoryProjectService {
    user_id: i64,
    projects: Arc<RwLock<BTreeMap<ProjectId, ProjectDto>>>,
}

impl Default for InMemoryProjectService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProjectService {
    pub fn new() -> Self {
        Self { user_id: DEFAULT_USER_ID, projects: Arc::new(RwLock::new(BTreeMap::new())) }
    }

    pub fn with_projects(projects: Vec<ProjectDto>) -> Self {
        let service = Self::new();
        {
            let mut guard = service.projects.write().expect("RwLock poisoned");
            for project in projects {
                guard.insert(project.id.clone(), project);
            }
        }
        service
    }

    /// Seeds the service from a JSON file holding a list of projects with their files.
    pub fn from_fixture(file_path: &str) -> Result<Self> {
        let projects: Vec<ProjectDto> = parse_json_file(file_path)?;
        log::info!("Loaded {} project(s) from fixture '{}'.", projects.len(), file_path);
        Ok(Self::with_projects(projects))
    }

    pub fn default_project_id(&self) -> ProjectId {
        ProjectId::new(format!("default-project-{}", self.user_id))
    }

    fn with_project<T>(&self, project_id: &ProjectId, f: impl FnOnce(&mut ProjectDto) -> Result<T>) -> Result<T> {
        let mut guard = self.projects.write().expect("RwLock poisoned");
        let project = guard.get_mut(project_id).ok_or_else(|| Error::NotFound(format!("Project {} not found", project_id)))?;
        f(project)
    }
}

#[async_trait]
impl ProjectService for InMemoryProjectService {
    async fn get_projects(&self) -> Result<Vec<ProjectDto>> {
        let guard = self.projects.read().expect("RwLock poisoned");
        Ok(guard.values().map(|project| ProjectDto { files: Vec::new(), ..project.clone() }).collect())
    }

    async fn get_default_project(&self) -> Result<ProjectDto> {
        let id = self.default_project_id();
        let mut guard = self.projects.write().expect("RwLock poisoned");
        let project = guard.entry(id.clone()).or_insert_with(|| {
            let now = Utc::now();
            ProjectDto {
                id,
                name: DEFAULT_PROJECT_NAME.to_string(),
                user_id: self.user_id,
                created_at: now,
                updated_at: now,
                files: Vec::new(),
            }
        });
        Ok(project.clone())
    }

    async fn get_project(&self, project_id: &ProjectId) -> Result<ProjectDto> {
        self.with_project(project_id, |project| Ok(project.clone()))
    }

    async fn create_project(&self, project: CreateProjectDto) -> Result<ProjectDto> {
        let mut guard = self.projects.write().expect("RwLock poisoned");
        if guard.contains_key(&project.id) {
            return Err(Error::Conflict("Project with this ID already exists".to_string()));
        }

        let now = Utc::now();
        let created = ProjectDto {
            id: project.id.clone(),
            name: project.name,
            user_id: self.user_id,
            created_at: now,
            updated_at: now,
            files: Vec::new(),
        };
        guard.insert(project.id, created.clone());
        Ok(created)
    }

    async fn update_project(&self, project_id: &ProjectId, name: &str) -> Result<ProjectDto> {
        self.with_project(project_id, |project| {
            project.name = name.to_string();
            project.updated_at = Utc::now();
            Ok(ProjectDto { files: Vec::new(), ..project.clone() })
        })
    }

    async fn delete_project(&self, project_id: &ProjectId) -> Result<MessageDto> {
        let mut guard = self.projects.write().expect("RwLock poisoned");
        match guard.remove(project_id) {
            Some(_) => Ok(MessageDto { message: "Project deleted successfully".to_string() }),
            None => Err(Error::NotFound(format!("Project {} not found", project_id))),
        }
    }

    async fn create_file(&self, project_id: &ProjectId, file: CreateFileDto) -> Result<ProjectFileDto> {
        self.with_project(project_id, |project| {
            if project.file(&file.id).is_some() {
                return Err(Error::Conflict("File with this ID already exists".to_string()));
            }

            let now = Utc::now();
            let created = ProjectFileDto {
                id: file.id,
                name: file.name,
                file_type: file.file_type,
                path: file.path,
                content: file.content,
                thumbnail: file.thumbnail,
                project_id: project.id.clone(),
                created_at: now,
                updated_at: now,
            };
            project.files.push(created.clone());
            project.updated_at = now;
            Ok(created)
        })
    }

    async fn update_file(&self, project_id: &ProjectId, file_id: &FileId, update: FileUpdateDto) -> Result<ProjectFileDto> {
        self.with_project(project_id, |project| {
            let file = project.file_mut(file_id).ok_or_else(|| Error::NotFound(format!("File {} not found", file_id)))?;

            if let Some(name) = update.name {
                file.name = name;
            }
            if let Some(content) = update.content {
                file.content = Some(content);
            }
            if let Some(thumbnail) = update.thumbnail {
                file.thumbnail = Some(thumbnail);
            }
            file.updated_at = Utc::now();

            Ok(file.clone())
        })
    }

    async fn delete_file(&self, project_id: &ProjectId, file_id: &FileId) -> Result<MessageDto> {
        self.with_project(project_id, |project| {
            let before = project.files.len();
            project.files.retain(|file| &file.id != file_id);
            if project.files.len() == before {
                return Err(Error::NotFound(format!("File {} not found", file_id)));
            }
            Ok(MessageDto { message: "File deleted successfully".to_string() })
        })
    }
}
