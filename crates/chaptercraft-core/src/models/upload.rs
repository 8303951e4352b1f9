use serde::{Deserialize, Serialize};

/// Result of uploading a manuscript: the server-side text extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub file_size: u64,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub extracted_text: String,
    #[serde(default)]
    pub word_count: u64,
}

impl UploadedFile {
    pub fn has_text(&self) -> bool {
        !self.extracted_text.trim().is_empty()
    }
}

/// File types accepted by the upload endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportedFileTypes {
    #[serde(default)]
    pub mime_types: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub max_file_size_mb: u64,
    #[serde(default)]
    pub description: String,
}
