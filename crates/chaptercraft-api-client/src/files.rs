//! Manuscript uploads.

use chaptercraft_core::models::{SupportedFileTypes, UploadedFile};
use chaptercraft_core::validation::validate_upload;
use chaptercraft_core::{AppError, AppResult};
use reqwest::multipart::{Form, Part};

use crate::{api_path, ApiClient};

impl ApiClient {
    /// Upload a manuscript for text extraction.
    ///
    /// The file is validated against `max_bytes` and the allowed extensions
    /// before anything is sent.
    pub async fn upload_file(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        max_bytes: u64,
    ) -> AppResult<UploadedFile> {
        let format = validate_upload(filename, bytes.len() as u64, max_bytes)?;
        let size = bytes.len();

        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(format.content_type())
            .map_err(|e| AppError::Internal(format!("Invalid content type: {}", e)))?;
        let form = Form::new().part("file", part);

        let uploaded: UploadedFile = self.post_multipart(&api_path("/files/upload"), form).await?;
        tracing::info!(
            filename = %filename,
            size_bytes = size,
            word_count = uploaded.word_count,
            "Manuscript uploaded"
        );
        Ok(uploaded)
    }

    pub async fn supported_file_types(&self) -> AppResult<SupportedFileTypes> {
        self.get(&api_path("/files/supported-types"), &[]).await
    }
}
