//! Data models for the application
//!
//! Transient, advisory copies of what the backend owns. Each sub-module covers
//! one feature area; everything is re-exported here.

mod admin;
mod generation;
mod plan;
mod progress;
mod project;
pub mod timestamp;
mod upload;
mod user;

// Re-export all models for convenient imports
pub use admin::*;
pub use generation::*;
pub use plan::*;
pub use progress::*;
pub use project::*;
pub use upload::*;
pub use user::*;
