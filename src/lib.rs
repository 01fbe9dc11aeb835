use std::sync::Arc;

use crate::config::SessionConfig;
use crate::domain::project_service::http_project_service::HttpProjectService;
use crate::domain::project_service::in_memory_project_service::InMemoryProjectService;
use crate::domain::session::controller::EditorSession;
use crate::error::Result;

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Builds a session backed by the HTTP project service described in `config`.
pub fn connect(config: &SessionConfig) -> Result<EditorSession> {
    let service = HttpProjectService::from_config(config)?;
    log::info!("Session connected to project service at '{}'.", service.base_url());
    Ok(EditorSession::new(Arc::new(service), config))
}

/// Builds a session backed by an in-memory project service seeded from a JSON fixture
/// (an array of projects with their files).
pub fn offline(fixture_path: &str, config: &SessionConfig) -> Result<EditorSession> {
    let service = InMemoryProjectService::from_fixture(fixture_path)?;
    log::info!("Session running offline from fixture '{}'.", fixture_path);
    Ok(EditorSession::new(Arc::new(service), config))
}
