use reqwest::Method;

use crate::domain::utils::id::{FileId, ProjectId};

#[derive(Debug)]
pub enum ProjectEndpoint<'a> {
    Projects,
    DefaultProject,
    CreateProject,
    Project(&'a ProjectId),
    UpdateProject(&'a ProjectId),
    DeleteProject(&'a ProjectId),
    CreateFile(&'a ProjectId),
    UpdateFile(&'a ProjectId, &'a FileId),
    DeleteFile(&'a ProjectId, &'a FileId),
}

impl ProjectEndpoint<'_> {
    pub fn path(&self) -> String {
        match self {
            Self::Projects | Self::CreateProject => "/projects".to_string(),
            Self::DefaultProject => "/default-project".to_string(),
            Self::Project(id) | Self::UpdateProject(id) | Self::DeleteProject(id) => format!("/projects/{}", id),
            Self::CreateFile(id) => format!("/projects/{}/files", id),
            Self::UpdateFile(project_id, file_id) | Self::DeleteFile(project_id, file_id) => {
                format!("/projects/{}/files/{}", project_id, file_id)
            }
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::Projects | Self::DefaultProject | Self::Project(_) => Method::GET,
            Self::CreateProject | Self::CreateFile(_) => Method::POST,
            Self::UpdateProject(_) | Self::UpdateFile(..) => Method::PUT,
            Self::DeleteProject(_) | Self::DeleteFile(..) => Method::DELETE,
        }
    }
}
