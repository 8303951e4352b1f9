//! Validation modules

pub mod upload;

pub use upload::{validate_upload, ManuscriptFormat, ALLOWED_EXTENSIONS};
