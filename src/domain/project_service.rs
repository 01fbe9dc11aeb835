pub mod http_project_service;
pub mod in_memory_project_service;
pub mod project_endpoint;
pub mod project_service_trait;
