pub mod content_dto;
pub mod project_dto;
pub mod timestamp;
