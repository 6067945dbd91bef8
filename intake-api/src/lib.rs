pub mod config;
pub mod database;
pub mod handlers;
pub mod helpers;
pub mod jobs;

pub use database::Database;
pub use jobs::intake_manager::{IntakeError, IntakeManager};
