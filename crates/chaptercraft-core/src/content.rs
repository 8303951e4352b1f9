//! Content segment parsing
//!
//! Generated books are loosely structured markdown: a `# Title`, `##` headings,
//! paragraphs, and illustration URLs from the image provider embedded either on
//! their own line, as `![alt](url)`, or as `**Page N Image:** url`. The parser
//! turns a body into typed segments so every renderer shares one reading of it.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::constants::IMAGE_PROVIDER_HOST;
use crate::error::AppError;

/// One typed piece of a project body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentSegment {
    Title(String),
    Heading { level: u8, text: String },
    Image { url: String, caption: Option<String> },
    Text(String),
}

/// Splits a body into [`ContentSegment`]s.
pub trait SegmentParser {
    fn parse(&self, text: &str) -> Vec<ContentSegment>;

    /// Whether the body carries at least one inline illustration.
    fn has_images(&self, text: &str) -> bool {
        self.parse(text)
            .iter()
            .any(|s| matches!(s, ContentSegment::Image { .. }))
    }
}

static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)\)").expect("markdown image pattern is valid")
});

static PAGE_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*(Page\s+\d+)\s+Image:?\*\*:?").expect("page image pattern is valid")
});

static DEFAULT_PARSER: LazyLock<ProviderImageParser> = LazyLock::new(|| {
    ProviderImageParser::new(IMAGE_PROVIDER_HOST).expect("escaped host is a valid pattern")
});

/// Parser that recognises images hosted by one provider.
#[derive(Debug, Clone)]
pub struct ProviderImageParser {
    url_pattern: Regex,
}

impl ProviderImageParser {
    pub fn new(host: &str) -> Result<Self, AppError> {
        let pattern = format!(r#"https?://{}/[^\s)\]"'<>]+"#, regex::escape(host));
        let url_pattern = Regex::new(&pattern)
            .map_err(|e| AppError::Internal(format!("Invalid image host pattern: {}", e)))?;
        Ok(Self { url_pattern })
    }

    fn image_in(&self, line: &str) -> Option<ContentSegment> {
        let url = self.url_pattern.find(line)?.as_str().to_string();

        let caption = if let Some(caps) = MARKDOWN_IMAGE.captures(line) {
            caps[1].trim().to_string()
        } else if let Some(caps) = PAGE_IMAGE.captures(line) {
            caps[1].to_string()
        } else {
            line.replace(&url, "")
                .trim_matches(|c: char| c.is_whitespace() || "*:![]()-".contains(c))
                .to_string()
        };
        let caption = Some(caption).filter(|c| !c.is_empty());

        Some(ContentSegment::Image { url, caption })
    }
}

impl SegmentParser for ProviderImageParser {
    fn parse(&self, text: &str) -> Vec<ContentSegment> {
        let mut segments = Vec::new();
        let mut paragraph: Vec<&str> = Vec::new();

        let flush = |paragraph: &mut Vec<&str>, segments: &mut Vec<ContentSegment>| {
            if !paragraph.is_empty() {
                segments.push(ContentSegment::Text(paragraph.join("\n")));
                paragraph.clear();
            }
        };

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                flush(&mut paragraph, &mut segments);
                continue;
            }

            if let Some(image) = self.image_in(trimmed) {
                flush(&mut paragraph, &mut segments);
                segments.push(image);
                continue;
            }

            if let Some(title) = trimmed.strip_prefix("# ") {
                flush(&mut paragraph, &mut segments);
                segments.push(ContentSegment::Title(title.trim().to_string()));
                continue;
            }

            if trimmed.starts_with("##") {
                let hashes = trimmed.chars().take_while(|c| *c == '#').count();
                let heading = trimmed[hashes..].trim();
                if !heading.is_empty() && trimmed[hashes..].starts_with(' ') {
                    flush(&mut paragraph, &mut segments);
                    segments.push(ContentSegment::Heading {
                        level: hashes.min(6) as u8,
                        text: heading.to_string(),
                    });
                    continue;
                }
            }

            paragraph.push(trimmed);
        }

        flush(&mut paragraph, &mut segments);
        segments
    }
}

/// Parse a body with the default image provider.
pub fn parse_segments(text: &str) -> Vec<ContentSegment> {
    DEFAULT_PARSER.parse(text)
}

/// Whether a body should be shown as an illustrated reading view.
pub fn has_inline_images(text: &str) -> bool {
    DEFAULT_PARSER.url_pattern.is_match(text)
}
