use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::api::project_dto::{ApiErrorDto, CreateFileDto, CreateProjectDto, FileUpdateDto, MessageDto, ProjectDto, ProjectFileDto};
use crate::config::SessionConfig;
use crate::domain::project_service::project_endpoint::ProjectEndpoint;
use crate::domain::project_service::project_service_trait::ProjectService;
use crate::domain::utils::id::{FileId, ProjectId};
use crate::error::{Error, Result};

/// Project service reached over its REST API.
#[derive(Debug, Clone)]
pub struct HttpProjectService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProjectService {
    pub fn new(base_url: impl Into<String>, auth_token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| Error::ConfigError(format!("auth token is not a valid header value: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder().default_headers(headers).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        Self::new(config.api_base_url.clone(), config.auth_token.as_deref())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, endpoint: &ProjectEndpoint<'_>) -> RequestBuilder {
        self.client.request(endpoint.method(), format!("{}{}", self.base_url, endpoint.path()))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, endpoint: ProjectEndpoint<'_>) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        if status == StatusCode::UNAUTHORIZED {
            log::warn!("Project service refused {:?}: authentication required.", endpoint);
            return Err(Error::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<ApiErrorDto>(&body) {
            Ok(error) => error.message(),
            Err(_) if body.is_empty() => status.to_string(),
            Err(_) => body,
        };

        log::error!(
            "Project service request failed.\nEndpoint: <<{} {}>>\nResponse-Status-Code: <<{}>>\nDetail: <<{}>>",
            endpoint.method(),
            endpoint.path(),
            status,
            detail
        );

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(detail));
        }
        Err(Error::ApiError { status: status.as_u16(), detail })
    }
}

#[async_trait]
impl ProjectService for HttpProjectService {
    async fn get_projects(&self) -> Result<Vec<ProjectDto>> {
        let endpoint = ProjectEndpoint::Projects;
        self.send(self.request(&endpoint), endpoint).await
    }

    async fn get_default_project(&self) -> Result<ProjectDto> {
        let endpoint = ProjectEndpoint::DefaultProject;
        self.send(self.request(&endpoint), endpoint).await
    }

    async fn get_project(&self, project_id: &ProjectId) -> Result<ProjectDto> {
        let endpoint = ProjectEndpoint::Project(project_id);
        self.send(self.request(&endpoint), endpoint).await
    }

    async fn create_project(&self, project: CreateProjectDto) -> Result<ProjectDto> {
        let endpoint = ProjectEndpoint::CreateProject;
        self.send(self.request(&endpoint).json(&project), endpoint).await
    }

    async fn update_project(&self, project_id: &ProjectId, name: &str) -> Result<ProjectDto> {
        let endpoint = ProjectEndpoint::UpdateProject(project_id);
        self.send(self.request(&endpoint).query(&[("project_name", name)]), endpoint).await
    }

    async fn delete_project(&self, project_id: &ProjectId) -> Result<MessageDto> {
        let endpoint = ProjectEndpoint::DeleteProject(project_id);
        self.send(self.request(&endpoint), endpoint).await
    }

    async fn create_file(&self, project_id: &ProjectId, file: CreateFileDto) -> Result<ProjectFileDto> {
        let endpoint = ProjectEndpoint::CreateFile(project_id);
        self.send(self.request(&endpoint).json(&file), endpoint).await
    }

    async fn update_file(&self, project_id: &ProjectId, file_id: &FileId, update: FileUpdateDto) -> Result<ProjectFileDto> {
        let endpoint = ProjectEndpoint::UpdateFile(project_id, file_id);
        self.send(self.request(&endpoint).json(&update), endpoint).await
    }

    async fn delete_file(&self, project_id: &ProjectId, file_id: &FileId) -> Result<MessageDto> {
        let endpoint = ProjectEndpoint::DeleteFile(project_id, file_id);
        self.send(self.request(&endpoint), endpoint).await
    }
}
