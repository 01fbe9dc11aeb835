pub mod canonical;
pub mod edge;
pub mod node;
pub mod pin;
pub mod snapshot;
pub mod templates;
