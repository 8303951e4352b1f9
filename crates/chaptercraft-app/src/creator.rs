//! Project creator
//!
//! Collects the creation form, validates it locally, then creates the project
//! and, for generation flows, starts the background job. Local validation
//! failures never reach the network.

use chaptercraft_api_client::ApiClient;
use chaptercraft_core::models::{
    AudiobookOptions, BookLength, GenerateBookRequest, Genre, Language, Project, ProjectCreate,
    UploadedFile,
};
use chaptercraft_core::{AppError, AppResult};
use validator::Validate;

use crate::routes::Route;

/// Where the book's content comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSource {
    /// Generate the book from a prompt.
    Prompt {
        prompt: String,
        length: BookLength,
        style: String,
    },
    /// Use an uploaded manuscript. `None` until a file has been attached.
    Upload(Option<UploadedFile>),
}

impl ContentSource {
    pub fn prompt(prompt: impl Into<String>) -> Self {
        ContentSource::Prompt {
            prompt: prompt.into(),
            length: BookLength::default(),
            style: "engaging".to_string(),
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct CreatorForm {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,
    #[validate(length(max = 255, message = "Author must be at most 255 characters"))]
    pub author: String,
    pub description: String,
    pub genre: Genre,
    pub target_language: Language,
    pub source: ContentSource,
}

impl CreatorForm {
    pub fn new(title: impl Into<String>, genre: Genre, source: ContentSource) -> Self {
        Self {
            title: title.into(),
            author: String::new(),
            description: String::new(),
            genre,
            target_language: Language::default(),
            source,
        }
    }

    /// Client-side checks run before any request.
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;

        if self.title.trim().is_empty() {
            return Err(AppError::InvalidInput("Please enter a title".to_string()));
        }

        match &self.source {
            ContentSource::Prompt { prompt, .. } if prompt.trim().is_empty() => Err(
                AppError::InvalidInput("Please enter a prompt for your book".to_string()),
            ),
            ContentSource::Upload(None) => Err(AppError::InvalidInput(
                "Please upload a manuscript".to_string(),
            )),
            ContentSource::Upload(Some(file)) if !file.has_text() => Err(AppError::InvalidInput(
                "The uploaded file has no readable content".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Whether submitting starts a background job.
    pub fn starts_generation(&self) -> bool {
        match self.source {
            ContentSource::Prompt { .. } => true,
            ContentSource::Upload(_) => self.genre == Genre::Audiobook,
        }
    }

    fn to_create(&self) -> ProjectCreate {
        let mut settings = self.genre.default_settings();
        settings.target_language = self.target_language;

        let content = match &self.source {
            ContentSource::Upload(Some(file)) => file.extracted_text.clone(),
            _ => String::new(),
        };

        ProjectCreate {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            description: self.description.trim().to_string(),
            settings,
            content,
        }
    }
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub project: Project,
    pub next: Route,
}

pub struct ProjectCreator {
    client: ApiClient,
    owner_id: String,
    max_upload_bytes: u64,
}

impl ProjectCreator {
    pub fn new(client: ApiClient, owner_id: impl Into<String>, max_upload_bytes: u64) -> Self {
        Self {
            client,
            owner_id: owner_id.into(),
            max_upload_bytes,
        }
    }

    /// Upload a manuscript and attach it to `form`.
    pub async fn attach_file(
        &self,
        form: &mut CreatorForm,
        filename: &str,
        bytes: Vec<u8>,
    ) -> AppResult<()> {
        let uploaded = self
            .client
            .upload_file(filename, bytes, self.max_upload_bytes)
            .await?;
        form.source = ContentSource::Upload(Some(uploaded));
        Ok(())
    }

    /// Validate, create, and start generation where the flow needs it.
    pub async fn submit(&self, form: &CreatorForm) -> AppResult<Submission> {
        form.check()?;

        let project = self
            .client
            .create_project(&self.owner_id, &form.to_create())
            .await?;

        let next = match &form.source {
            ContentSource::Prompt {
                prompt,
                length,
                style,
            } => {
                let request = GenerateBookRequest {
                    prompt: prompt.trim().to_string(),
                    genre: form.genre,
                    target_language: form.target_language,
                    length: *length,
                    style: style.clone(),
                    project_id: Some(project.id.clone()),
                };
                let started = self.client.generate_book(&request).await?;
                Route::Progress(started.project_id.unwrap_or_else(|| project.id.clone()))
            }
            ContentSource::Upload(_) if form.starts_generation() => {
                self.client
                    .generate_audiobook(&project.id, &AudiobookOptions::default())
                    .await?;
                Route::Progress(project.id.clone())
            }
            ContentSource::Upload(_) => Route::Project(project.id.clone()),
        };

        tracing::info!(project_id = %project.id, next = %next, "Project submitted");
        Ok(Submission { project, next })
    }
}
