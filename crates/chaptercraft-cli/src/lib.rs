use anyhow::Context;
use chaptercraft_app::dashboard::ProjectStats;
use chaptercraft_app::tracker::ProgressView;
use chaptercraft_core::models::{Project, StepStatus};
use chaptercraft_core::ContentSegment;
use serde::Serialize;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// One dashboard line: id, status, progress, genre and title.
pub fn project_row(project: &Project) -> String {
    format!(
        "{:<38} {:<10} {:>3}%  {:<13} {}",
        project.id,
        project.status.to_string(),
        project.progress.clamp(0, 100),
        project.genre().label(),
        truncate_string(&project.title, 40)
    )
}

pub fn stats_line(stats: &ProjectStats) -> String {
    format!(
        "{} projects: {} completed, {} processing, {} drafts, {} failed",
        stats.total, stats.completed, stats.processing, stats.drafts, stats.failed
    )
}

/// Tracker output for one snapshot.
pub fn progress_lines(view: &ProgressView) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {:>3}%  {}",
        view.bar(40),
        view.percent,
        view.current_step
    )];
    for step in &view.steps {
        let mark = match step.status {
            StepStatus::Completed => "x",
            StepStatus::InProgress => ">",
            StepStatus::Pending => " ",
        };
        lines.push(format!("  [{}] {}  {}", mark, step.step_name, step.message));
    }
    lines
}

/// Plain-text rendering of a parsed body.
pub fn render_segments(segments: &[ContentSegment]) -> String {
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        out.push(match segment {
            ContentSegment::Title(title) => format!("{}\n{}", title, "=".repeat(title.chars().count())),
            ContentSegment::Heading { text, .. } => format!("{}\n{}", text, "-".repeat(text.chars().count())),
            ContentSegment::Image { url, caption } => match caption {
                Some(caption) => format!("[image: {}] {}", caption, url),
                None => format!("[image] {}", url),
            },
            ContentSegment::Text(text) => text.clone(),
        });
    }
    out.join("\n\n")
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
