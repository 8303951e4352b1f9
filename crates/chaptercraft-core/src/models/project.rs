use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::timestamp;

/// Content type of a project. Determines validation rules and default settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Ebook,
    Novel,
    KidsStory,
    ColoringBook,
    Audiobook,
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::Ebook,
        Genre::Novel,
        Genre::KidsStory,
        Genre::ColoringBook,
        Genre::Audiobook,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Genre::Ebook => "eBook",
            Genre::Novel => "Novel",
            Genre::KidsStory => "Kids' Story",
            Genre::ColoringBook => "Coloring Book",
            Genre::Audiobook => "Audiobook",
        }
    }

    /// Picture-book formats print on the larger page and carry illustrations.
    pub fn is_illustrated(&self) -> bool {
        matches!(self, Genre::KidsStory | Genre::ColoringBook)
    }

    /// Settings the creator form starts from for this genre.
    pub fn default_settings(&self) -> BookSettings {
        let (page_size, max_pages, min_pages) = match self {
            Genre::Ebook => ("6x9", 150, Some(30)),
            Genre::Novel => ("6x9", 300, Some(100)),
            Genre::KidsStory => ("8x10", 32, Some(12)),
            Genre::ColoringBook => ("8x10", 50, Some(20)),
            Genre::Audiobook => ("6x9", 300, None),
        };

        BookSettings {
            genre: *self,
            target_language: Language::default(),
            page_size: page_size.to_string(),
            max_pages,
            min_pages,
            include_images: self.is_illustrated(),
            voice_style: if matches!(self, Genre::Audiobook) {
                "narrator".to_string()
            } else {
                default_voice_style()
            },
            chapter_structure: !self.is_illustrated(),
        }
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Genre::Ebook => write!(f, "ebook"),
            Genre::Novel => write!(f, "novel"),
            Genre::KidsStory => write!(f, "kids_story"),
            Genre::ColoringBook => write!(f, "coloring_book"),
            Genre::Audiobook => write!(f, "audiobook"),
        }
    }
}

impl FromStr for Genre {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "ebook" => Ok(Genre::Ebook),
            "novel" => Ok(Genre::Novel),
            "kids_story" => Ok(Genre::KidsStory),
            "coloring_book" => Ok(Genre::ColoringBook),
            "audiobook" => Ok(Genre::Audiobook),
            _ => Err(anyhow::anyhow!("Invalid genre: {}", s)),
        }
    }
}

/// Target language of a project.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
    Es,
    Zh,
    Hi,
    Ja,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::Zh => "zh",
            Language::Hi => "hi",
            Language::Ja => "ja",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "French",
            Language::Es => "Spanish",
            Language::Zh => "Mandarin",
            Language::Hi => "Hindi",
            Language::Ja => "Japanese",
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "fr" | "french" => Ok(Language::Fr),
            "es" | "spanish" => Ok(Language::Es),
            "zh" | "mandarin" | "chinese" => Ok(Language::Zh),
            "hi" | "hindi" => Ok(Language::Hi),
            "ja" | "japanese" => Ok(Language::Ja),
            _ => Err(anyhow::anyhow!("Unsupported language: {}", s)),
        }
    }
}

/// Lifecycle status of a project as reported by the backend.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    #[serde(alias = "pending")]
    Draft,
    Processing,
    Completed,
    Failed,
}

impl ProjectStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Failed)
    }

    /// Whether `self` may be observed after `previous`.
    ///
    /// Status only moves draft → processing → {completed | failed}; repeating
    /// the same status is allowed.
    pub fn can_follow(&self, previous: ProjectStatus) -> bool {
        self.rank() >= previous.rank() && !(previous.is_terminal() && *self != previous)
    }

    fn rank(&self) -> u8 {
        match self {
            ProjectStatus::Draft => 0,
            ProjectStatus::Processing => 1,
            ProjectStatus::Completed | ProjectStatus::Failed => 2,
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProjectStatus::Draft => write!(f, "draft"),
            ProjectStatus::Processing => write!(f, "processing"),
            ProjectStatus::Completed => write!(f, "completed"),
            ProjectStatus::Failed => write!(f, "failed"),
        }
    }
}

fn default_page_size() -> String {
    "6x9".to_string()
}

fn default_max_pages() -> u32 {
    100
}

fn default_voice_style() -> String {
    "neutral".to_string()
}

fn default_true() -> bool {
    true
}

/// Genre-specific generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSettings {
    pub genre: Genre,
    #[serde(default)]
    pub target_language: Language,
    #[serde(default = "default_page_size")]
    pub page_size: String,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default)]
    pub min_pages: Option<u32>,
    #[serde(default)]
    pub include_images: bool,
    #[serde(default = "default_voice_style")]
    pub voice_style: String,
    #[serde(default = "default_true")]
    pub chapter_structure: bool,
}

/// A user-owned book or audiobook project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    pub settings: BookSettings,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub generated_content: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub audio_file_url: Option<String>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn genre(&self) -> Genre {
        self.settings.genre
    }

    /// Body shown to the reader: generated text when present, otherwise the manuscript.
    pub fn body(&self) -> &str {
        if self.generated_content.trim().is_empty() {
            &self.content
        } else {
            &self.generated_content
        }
    }

    /// Text the editor works on. The backend only stores edits in `content`,
    /// so `generated_content` is just the starting point until `content` exists.
    pub fn editable_body(&self) -> &str {
        if self.content.trim().is_empty() {
            &self.generated_content
        } else {
            &self.content
        }
    }

    pub fn word_count(&self) -> usize {
        self.body().split_whitespace().count()
    }

    pub fn has_audio(&self) -> bool {
        self.audio_file_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Request DTO for creating a project
#[derive(Debug, Clone, Serialize)]
pub struct ProjectCreate {
    pub title: String,
    pub author: String,
    pub description: String,
    pub settings: BookSettings,
    pub content: String,
}

/// Request DTO for updating a project. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.description.is_none()
            && self.content.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_from_backend_json() {
        let json = r#"{
            "id": "p-1",
            "user_id": "u-1",
            "title": "The Lighthouse",
            "settings": {"genre": "kids_story", "target_language": "fr", "page_size": "8x10", "max_pages": 32},
            "status": "pending",
            "progress": 0,
            "created_at": "2024-05-01T10:00:00.123456"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.genre(), Genre::KidsStory);
        assert_eq!(project.settings.target_language, Language::Fr);
        assert_eq!(project.status, ProjectStatus::Draft);
        assert!(project.settings.chapter_structure);
        assert!(project.created_at.is_some());
        assert!(project.cover_image_url.is_none());
    }

    #[test]
    fn test_body_prefers_generated_content() {
        let mut project: Project = serde_json::from_str(
            r#"{"id":"p","title":"t","settings":{"genre":"novel"},"content":"one two"}"#,
        )
        .unwrap();
        assert_eq!(project.body(), "one two");
        assert_eq!(project.word_count(), 2);

        project.generated_content = "generated text here".to_string();
        assert_eq!(project.body(), "generated text here");
        assert_eq!(project.editable_body(), "one two");

        project.content.clear();
        assert_eq!(project.editable_body(), "generated text here");
    }

    #[test]
    fn test_status_only_moves_forward() {
        use ProjectStatus::*;
        assert!(Processing.can_follow(Draft));
        assert!(Completed.can_follow(Processing));
        assert!(Failed.can_follow(Processing));
        assert!(Processing.can_follow(Processing));
        assert!(!Draft.can_follow(Processing));
        assert!(!Processing.can_follow(Completed));
        assert!(!Failed.can_follow(Completed));
    }

    #[test]
    fn test_genre_parsing_and_defaults() {
        assert_eq!("kids-story".parse::<Genre>().unwrap(), Genre::KidsStory);
        assert!("poem".parse::<Genre>().is_err());

        let settings = Genre::ColoringBook.default_settings();
        assert_eq!(settings.page_size, "8x10");
        assert!(settings.include_images);
        assert!(!settings.chapter_structure);
        assert_eq!(Genre::Audiobook.default_settings().voice_style, "narrator");
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let update = ProjectUpdate {
            title: Some("New".to_string()),
            ..ProjectUpdate::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({"title": "New"}));
        assert!(ProjectUpdate::default().is_empty());
    }
}
