use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::project::{Genre, Language};
use crate::error::AppError;

/// Requested length of a prompt-generated book.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookLength {
    Short,
    #[default]
    Medium,
    Long,
}

/// Request DTO for generating a book from a prompt
#[derive(Debug, Clone, Serialize)]
pub struct GenerateBookRequest {
    pub prompt: String,
    pub genre: Genre,
    pub target_language: Language,
    pub length: BookLength,
    pub style: String,
    /// Project the generated content belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

/// Acknowledgement returned when a background job was started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStarted {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// Narration options for audiobook generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudiobookOptions {
    pub voice_style: String,
    pub speed: f32,
}

impl Default for AudiobookOptions {
    fn default() -> Self {
        Self {
            voice_style: "narrator".to_string(),
            speed: 1.0,
        }
    }
}

/// Request DTO for cover art generation
#[derive(Debug, Clone, Serialize)]
pub struct CoverArtRequest {
    pub title: String,
    pub genre: Genre,
    pub description: String,
    pub style: String,
}

/// Result of a cover art generation. The provider reports failure in-band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverArtResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub prompt_used: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CoverArtResponse {
    /// The generated image URL, or the provider's failure as an error.
    pub fn into_image_url(self) -> Result<String, AppError> {
        match (self.success, self.image_url) {
            (true, Some(url)) if !url.is_empty() => Ok(url),
            _ => Err(AppError::Generation(
                self.error
                    .unwrap_or_else(|| "Cover generation returned no image".to_string()),
            )),
        }
    }
}

/// Request DTO for title suggestions
#[derive(Debug, Clone, Serialize)]
pub struct TitleSuggestionRequest {
    pub content_sample: String,
    pub genre: Genre,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSuggestions {
    #[serde(default)]
    pub titles: Vec<String>,
}

/// Request DTO for a chapter outline
#[derive(Debug, Clone, Serialize)]
pub struct OutlineRequest {
    pub title: String,
    pub genre: Genre,
    pub content_summary: String,
    pub num_chapters: u32,
}

/// Outline returned by the text provider; its inner structure is provider-defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub outline: serde_json::Value,
}

/// Narration voices keyed by language code.
pub type VoiceCatalog = BTreeMap<String, Vec<String>>;

/// Cover styles for one genre: style name → description.
pub type CoverStyles = BTreeMap<String, String>;

/// Language code → display name.
pub type LanguageCatalog = BTreeMap<String, String>;

/// Request DTO for translating text
#[derive(Debug, Clone, Serialize)]
pub struct TranslationRequest {
    pub text: String,
    pub target_language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<Language>,
    pub preserve_formatting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub original_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Backend health report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub services: BTreeMap<String, String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }

    /// Services the backend reports as anything but configured.
    pub fn unconfigured_services(&self) -> Vec<&str> {
        self.services
            .iter()
            .filter(|(_, state)| state.as_str() != "configured")
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
