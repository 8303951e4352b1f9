//! Manuscript upload validation
//!
//! Runs before any bytes are sent:
//! - Size must not exceed the configured cap (25 MB by default)
//! - Extension must be one of txt, pdf, docx

use std::path::Path;

use crate::error::AppError;

/// Extensions accepted for manuscripts.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["txt", "pdf", "docx"];

/// Accepted manuscript formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManuscriptFormat {
    PlainText,
    Pdf,
    Docx,
}

impl ManuscriptFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" => Some(ManuscriptFormat::PlainText),
            "pdf" => Some(ManuscriptFormat::Pdf),
            "docx" => Some(ManuscriptFormat::Docx),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ManuscriptFormat::PlainText => "text/plain",
            ManuscriptFormat::Pdf => "application/pdf",
            ManuscriptFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Validate a manuscript by name and size.
///
/// Returns the detected format so the caller can label the upload.
pub fn validate_upload(
    filename: &str,
    size_bytes: u64,
    max_bytes: u64,
) -> Result<ManuscriptFormat, AppError> {
    if size_bytes > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {}MB",
            max_bytes / (1024 * 1024)
        )));
    }

    if size_bytes == 0 {
        return Err(AppError::InvalidInput(format!("File '{}' is empty", filename)));
    }

    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ManuscriptFormat::from_extension)
        .ok_or_else(|| {
            AppError::UnsupportedFileType(
                "File type not supported. Supported types: TXT, PDF, DOCX".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn test_accepts_supported_types_up_to_cap() {
        assert_eq!(
            validate_upload("draft.txt", 10, 25 * MB).unwrap(),
            ManuscriptFormat::PlainText
        );
        assert_eq!(
            validate_upload("Draft.PDF", 25 * MB, 25 * MB).unwrap(),
            ManuscriptFormat::Pdf
        );
        assert_eq!(
            validate_upload("book.docx", MB, 25 * MB)
                .unwrap()
                .content_type(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[test]
    fn test_rejects_files_over_cap() {
        let err = validate_upload("draft.txt", 25 * MB + 1, 25 * MB).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert!(err.to_string().contains("25MB"));
    }

    #[test]
    fn test_rejects_other_types() {
        for name in ["cover.png", "legacy.doc", "noextension", "archive.txt.zip"] {
            let err = validate_upload(name, 100, 25 * MB).unwrap_err();
            assert!(
                matches!(err, AppError::UnsupportedFileType(_)),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_empty_file() {
        assert!(matches!(
            validate_upload("empty.txt", 0, 25 * MB),
            Err(AppError::InvalidInput(_))
        ));
    }
}
