//! Triggers for the backend's AI jobs: book text, narration and cover art.
//!
//! Book and audiobook generation run in the background; the response only
//! acknowledges the job and progress is read through [`ApiClient::get_progress`].
//! Cover art is synchronous and reports provider failures in-band.

use chaptercraft_core::models::{
    AudiobookOptions, CoverArtRequest, CoverArtResponse, GenerateBookRequest, GenerationStarted,
    Outline, OutlineRequest, TitleSuggestionRequest, TitleSuggestions,
};
use chaptercraft_core::AppResult;

use crate::{api_path, segment, ApiClient};

impl ApiClient {
    pub async fn generate_book(&self, request: &GenerateBookRequest) -> AppResult<GenerationStarted> {
        let started: GenerationStarted = self
            .post_json(&api_path("/ai/generate-book"), &[], request)
            .await?;
        tracing::info!(
            project_id = ?started.project_id,
            genre = %request.genre,
            "Book generation started"
        );
        Ok(started)
    }

    pub async fn generate_audiobook(
        &self,
        project_id: &str,
        options: &AudiobookOptions,
    ) -> AppResult<GenerationStarted> {
        let query = [
            ("voice_style", options.voice_style.clone()),
            ("speed", options.speed.to_string()),
        ];
        let started: GenerationStarted = self
            .post_query(
                &api_path(&format!("/audio/generate-audiobook/{}", segment(project_id))),
                &query,
            )
            .await?;
        tracing::info!(project_id = %project_id, voice_style = %options.voice_style, "Audiobook generation started");
        Ok(started)
    }

    /// Request cover art. Check the result with [`CoverArtResponse::into_image_url`].
    pub async fn generate_cover(&self, request: &CoverArtRequest) -> AppResult<CoverArtResponse> {
        self.post_json(&api_path("/images/generate-cover"), &[], request)
            .await
    }

    pub async fn generate_titles(&self, request: &TitleSuggestionRequest) -> AppResult<TitleSuggestions> {
        self.post_json(&api_path("/ai/generate-titles"), &[], request)
            .await
    }

    pub async fn generate_outline(&self, request: &OutlineRequest) -> AppResult<Outline> {
        self.post_json(&api_path("/ai/generate-outline"), &[], request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::client_for;
    use chaptercraft_core::models::{AudiobookOptions, CoverArtRequest, Genre};
    use chaptercraft_core::AppError;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_audiobook_options_go_in_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/audio/generate-audiobook/p-1")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("voice_style".into(), "narrator".into()),
                Matcher::UrlEncoded("speed".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"message":"Audiobook generation started","project_id":"p-1","status":"processing"}"#)
            .create_async()
            .await;

        let started = client_for(&server)
            .generate_audiobook("p-1", &AudiobookOptions::default())
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(started.project_id.as_deref(), Some("p-1"));
        assert_eq!(started.status, "processing");
    }

    #[tokio::test]
    async fn test_cover_failure_reported_in_band() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/images/generate-cover")
            .with_status(200)
            .with_body(r#"{"success":false,"error":"Image service unavailable"}"#)
            .create_async()
            .await;

        let response = client_for(&server)
            .generate_cover(&CoverArtRequest {
                title: "Tides".to_string(),
                genre: Genre::Novel,
                description: String::new(),
                style: "professional".to_string(),
            })
            .await
            .unwrap();
        assert!(matches!(
            response.into_image_url(),
            Err(AppError::Generation(ref m)) if m == "Image service unavailable"
        ));
    }
}
