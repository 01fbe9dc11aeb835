pub mod graph;
pub mod modification_tracker;
pub mod project_service;
pub mod session;
pub mod store;
pub mod utils;
