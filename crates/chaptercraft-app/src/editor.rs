//! Project editor
//!
//! Loads one project and exposes three independent actions: save the edited
//! fields, generate cover art, and start audiobook narration. None of them
//! blocks the others.

use chaptercraft_api_client::ApiClient;
use chaptercraft_core::content::{has_inline_images, parse_segments, ContentSegment};
use chaptercraft_core::models::{AudiobookOptions, CoverArtRequest, Project, ProjectUpdate};
use chaptercraft_core::AppResult;

use crate::routes::Route;

/// Editable copy of the project's text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorDraft {
    pub title: String,
    pub author: String,
    pub description: String,
    pub content: String,
}

impl EditorDraft {
    fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            author: project.author.clone(),
            description: project.description.clone(),
            content: project.editable_body().to_string(),
        }
    }
}

pub struct ProjectEditor {
    client: ApiClient,
    project: Project,
    draft: EditorDraft,
}

impl ProjectEditor {
    pub async fn load(client: ApiClient, project_id: &str) -> AppResult<Self> {
        let project = client.get_project(project_id).await?;
        let draft = EditorDraft::from_project(&project);
        Ok(Self {
            client,
            project,
            draft,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn draft(&self) -> &EditorDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut EditorDraft {
        &mut self.draft
    }

    /// Fields that differ from the loaded project.
    pub fn changes(&self) -> ProjectUpdate {
        let saved = EditorDraft::from_project(&self.project);
        let changed = |new: &String, old: &String| (new != old).then(|| new.clone());
        ProjectUpdate {
            title: changed(&self.draft.title, &saved.title),
            author: changed(&self.draft.author, &saved.author),
            description: changed(&self.draft.description, &saved.description),
            content: changed(&self.draft.content, &saved.content),
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.changes().is_empty()
    }

    /// Save changed fields. Returns `false` when there was nothing to save.
    pub async fn save(&mut self) -> AppResult<bool> {
        let update = self.changes();
        if update.is_empty() {
            return Ok(false);
        }

        let saved = self.client.update_project(&self.project.id, &update).await?;
        self.replace(saved);
        tracing::info!(project_id = %self.project.id, "Project saved");
        Ok(true)
    }

    /// Generate cover art and keep its URL on the project.
    pub async fn generate_cover(&mut self, style: &str) -> AppResult<String> {
        let request = CoverArtRequest {
            title: self.draft.title.clone(),
            genre: self.project.genre(),
            description: self.draft.description.clone(),
            style: style.to_string(),
        };
        let url = self.client.generate_cover(&request).await?.into_image_url()?;
        self.project.cover_image_url = Some(url.clone());
        tracing::info!(project_id = %self.project.id, "Cover generated");
        Ok(url)
    }

    /// Start narration; the caller follows the returned route to the tracker.
    pub async fn generate_audio(&self, options: &AudiobookOptions) -> AppResult<Route> {
        self.client
            .generate_audiobook(&self.project.id, options)
            .await?;
        Ok(Route::Progress(self.project.id.clone()))
    }

    /// Reload the project from the backend, discarding unsaved edits.
    pub async fn refresh(&mut self) -> AppResult<()> {
        let project = self.client.get_project(&self.project.id).await?;
        self.replace(project);
        Ok(())
    }

    /// Segments of the draft content for the reading view.
    pub fn preview(&self) -> Vec<ContentSegment> {
        parse_segments(&self.draft.content)
    }

    pub fn is_illustrated(&self) -> bool {
        has_inline_images(&self.draft.content)
    }

    fn replace(&mut self, project: Project) {
        if !project.status.can_follow(self.project.status) {
            tracing::warn!(
                project_id = %project.id,
                previous = %self.project.status,
                current = %project.status,
                "Backend reported a status that moves backwards"
            );
        }
        self.draft = EditorDraft::from_project(&project);
        self.project = project;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    const PROJECT: &str = r##"{"id":"p-1","title":"Tides","author":"Ada","settings":{"genre":"kids_story"},
        "status":"completed","progress":100,"content":"",
        "generated_content":"# Tides\n\nhttps://image.pollinations.ai/prompt/sea\n\nThe end."}"##;

    async fn editor(server: &mut mockito::ServerGuard) -> ProjectEditor {
        server
            .mock("GET", "/api/projects/detail/p-1")
            .with_status(200)
            .with_body(PROJECT)
            .create_async()
            .await;
        let client = ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        ProjectEditor::load(client, "p-1").await.unwrap()
    }

    #[tokio::test]
    async fn test_load_starts_from_generated_content() {
        let mut server = mockito::Server::new_async().await;
        let editor = editor(&mut server).await;

        assert!(editor.draft().content.starts_with("# Tides"));
        assert!(editor.is_illustrated());
        assert!(!editor.is_dirty());
        assert_eq!(
            editor.preview()[1],
            ContentSegment::Image {
                url: "https://image.pollinations.ai/prompt/sea".to_string(),
                caption: None
            }
        );
    }

    #[tokio::test]
    async fn test_save_sends_only_changes() {
        let mut server = mockito::Server::new_async().await;
        let mut editor = editor(&mut server).await;
        let put = server
            .mock("PUT", "/api/projects/p-1")
            .match_body(Matcher::Json(json!({"title": "Low Tide"})))
            .with_status(200)
            .with_body(PROJECT.replace("\"Tides\"", "\"Low Tide\""))
            .expect(1)
            .create_async()
            .await;

        assert!(!editor.save().await.unwrap());
        editor.draft_mut().title = "Low Tide".to_string();
        assert!(editor.save().await.unwrap());

        put.assert_async().await;
        assert_eq!(editor.project().title, "Low Tide");
        assert!(!editor.is_dirty());
    }

    #[tokio::test]
    async fn test_saved_content_edit_survives_unchanged_generated_text() {
        let mut server = mockito::Server::new_async().await;
        let mut editor = editor(&mut server).await;
        let saved = serde_json::from_str::<serde_json::Value>(PROJECT)
            .map(|mut body| {
                body["content"] = json!("edited text");
                body.to_string()
            })
            .unwrap();
        server
            .mock("PUT", "/api/projects/p-1")
            .match_body(Matcher::Json(json!({"content": "edited text"})))
            .with_status(200)
            .with_body(saved)
            .create_async()
            .await;

        editor.draft_mut().content = "edited text".to_string();
        assert!(editor.save().await.unwrap());

        assert_eq!(editor.draft().content, "edited text");
        assert!(!editor.is_dirty());
        assert!(!editor.project().generated_content.is_empty());
        assert_eq!(
            editor.preview(),
            vec![ContentSegment::Text("edited text".to_string())]
        );
    }

    #[tokio::test]
    async fn test_cover_and_audio_actions() {
        let mut server = mockito::Server::new_async().await;
        let mut editor = editor(&mut server).await;
        server
            .mock("POST", "/api/images/generate-cover")
            .match_body(Matcher::PartialJson(json!({"genre": "kids_story", "style": "cartoon"})))
            .with_status(200)
            .with_body(r#"{"success":true,"image_url":"https://cdn.test/cover.png"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/api/audio/generate-audiobook/p-1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"project_id":"p-1","message":"Audiobook generation started","status":"processing"}"#)
            .create_async()
            .await;

        let url = editor.generate_cover("cartoon").await.unwrap();
        assert_eq!(url, "https://cdn.test/cover.png");
        assert_eq!(editor.project().cover_image_url.as_deref(), Some(url.as_str()));

        let next = editor
            .generate_audio(&AudiobookOptions::default())
            .await
            .unwrap();
        assert_eq!(next, Route::Progress("p-1".to_string()));
    }
}
