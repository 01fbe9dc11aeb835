pub mod canvas;
pub mod command;
pub mod controller;
pub mod file_state;
pub mod flush_schedule;
pub mod open_file;
pub mod pending_save;
pub mod shared_session;
