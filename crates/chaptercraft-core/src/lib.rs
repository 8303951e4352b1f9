//! Chaptercraft Core Library
//!
//! This crate provides the domain models, error types, client configuration,
//! validation and content parsing shared by every Chaptercraft client crate.

pub mod config;
pub mod constants;
pub mod content;
pub mod error;
pub mod error_payload;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use content::{parse_segments, ContentSegment};
pub use error::{AppError, AppResult, ErrorMetadata, LogLevel};
pub use error_payload::{ErrorPayload, FieldError};
