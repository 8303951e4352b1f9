//! Read-only catalogs and small helpers: voices, cover styles, languages,
//! translation, upload limits and backend health.

use chaptercraft_core::models::{
    CoverStyles, Genre, HealthStatus, Language, LanguageCatalog, TranslationRequest,
    TranslationResponse, VoiceCatalog,
};
use chaptercraft_core::AppResult;

use crate::{api_path, segment, ApiClient};

impl ApiClient {
    /// Narration voices, optionally restricted to one language.
    pub async fn voices(&self, language: Option<Language>) -> AppResult<VoiceCatalog> {
        let query: Vec<(&str, String)> = language
            .map(|l| vec![("language", l.code().to_string())])
            .unwrap_or_default();
        self.get(&api_path("/audio/voices"), &query).await
    }

    pub async fn cover_styles(&self, genre: Genre) -> AppResult<CoverStyles> {
        self.get(
            &api_path(&format!("/images/styles/{}", segment(&genre.to_string()))),
            &[],
        )
        .await
    }

    pub async fn translation_languages(&self) -> AppResult<LanguageCatalog> {
        self.get(&api_path("/translate/languages"), &[]).await
    }

    pub async fn translate(&self, request: &TranslationRequest) -> AppResult<TranslationResponse> {
        self.post_json(&api_path("/translate/text"), &[], request)
            .await
    }

    pub async fn health(&self) -> AppResult<HealthStatus> {
        self.get(&api_path("/health"), &[]).await
    }
}
