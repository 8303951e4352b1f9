//! Chaptercraft CLI: command-line client for the Chaptercraft backend.
//!
//! Set CHAPTERCRAFT_API_URL (or API_URL). The session is kept in
//! CHAPTERCRAFT_SESSION_FILE, default `~/.chaptercraft/session.json`.

use std::path::PathBuf;

use anyhow::Context;
use chaptercraft_app::admin::AdminView;
use chaptercraft_app::dashboard::Dashboard;
use chaptercraft_app::pricing::{payment_summary, PricingView};
use chaptercraft_app::{
    AppContext, ContentSource, CreatorForm, ProjectEditor, Route, TrackerEvent, TrackerState,
};
use chaptercraft_cli::{
    init_tracing, print_json, progress_lines, project_row, render_segments, stats_line,
};
use chaptercraft_core::models::{
    AudiobookOptions, BookLength, Genre, Language, LoginRequest, OutlineRequest, RegisterRequest,
    TitleSuggestionRequest, TranslationRequest,
};
use chaptercraft_core::{AppError, ClientConfig, ErrorMetadata};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "chaptercraft", about = "Chaptercraft book studio CLI")]
struct Cli {
    /// Print raw JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        email: String,
        #[arg(long, env = "CHAPTERCRAFT_PASSWORD")]
        password: String,
    },
    /// Create an account and sign in
    Register {
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long, env = "CHAPTERCRAFT_PASSWORD")]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Project operations
    Projects {
        #[command(subcommand)]
        sub: ProjectCommands,
    },
    /// Follow generation progress until it completes (Ctrl-C to leave)
    Track { id: String },
    /// Generate cover art for a project
    Cover {
        id: String,
        #[arg(long, default_value = "professional")]
        style: String,
    },
    /// Start audiobook narration for a project
    Audio {
        id: String,
        #[arg(long, default_value = "narrator")]
        voice: String,
        #[arg(long, default_value_t = 1.0)]
        speed: f32,
        /// Return immediately instead of tracking progress
        #[arg(long)]
        no_track: bool,
    },
    /// Show subscription plans
    Plans,
    /// Start a checkout for a plan and print the payment URL
    Checkout {
        plan_id: String,
        #[arg(long, default_value = "http://localhost:3000/payment/success")]
        success_url: String,
        #[arg(long, default_value = "http://localhost:3000/pricing")]
        cancel_url: String,
    },
    /// Show the result of a checkout session
    Payment { session_id: String },
    /// Print the customer portal URL
    Portal {
        #[arg(long, default_value = "http://localhost:3000/dashboard")]
        return_url: String,
    },
    /// Show admin statistics
    Admin,
    /// Suggest titles for a content sample
    Titles {
        /// Text file holding the sample
        sample: PathBuf,
        #[arg(long, value_enum, default_value_t = GenreArg::Novel)]
        genre: GenreArg,
    },
    /// Generate a chapter outline
    Outline {
        title: String,
        #[arg(long, value_enum, default_value_t = GenreArg::Novel)]
        genre: GenreArg,
        #[arg(long, default_value = "")]
        summary: String,
        #[arg(long, default_value_t = 10)]
        chapters: u32,
    },
    /// List narration voices
    Voices {
        #[arg(long, value_enum)]
        language: Option<LanguageArg>,
    },
    /// List cover styles for a genre
    Styles {
        #[arg(value_enum)]
        genre: GenreArg,
    },
    /// Translate a piece of text
    Translate {
        text: String,
        #[arg(long, value_enum)]
        to: LanguageArg,
        #[arg(long, value_enum)]
        from: Option<LanguageArg>,
    },
    /// List translation languages
    Languages,
    /// Show accepted manuscript types
    FileTypes,
    /// Check backend health
    Health,
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List your projects
    List,
    /// Show one project
    Show {
        id: String,
        /// Render the book body
        #[arg(long)]
        preview: bool,
    },
    /// Create a project from a prompt or a manuscript
    Create {
        title: String,
        #[arg(long, value_enum, default_value_t = GenreArg::Ebook)]
        genre: GenreArg,
        #[arg(long, value_enum, default_value_t = LanguageArg::En)]
        language: LanguageArg,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Generate the book from this prompt
        #[arg(long, conflicts_with = "file")]
        prompt: Option<String>,
        /// Upload this manuscript (txt, pdf, docx)
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = LengthArg::Medium)]
        length: LengthArg,
        #[arg(long, default_value = "engaging")]
        style: String,
        /// Do not follow generation progress
        #[arg(long)]
        no_track: bool,
    },
    /// Edit a project's fields
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replace the body with the contents of this file
        #[arg(long)]
        content_file: Option<PathBuf>,
    },
    /// Delete a project
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum GenreArg {
    Ebook,
    Novel,
    KidsStory,
    ColoringBook,
    Audiobook,
}

impl From<GenreArg> for Genre {
    fn from(arg: GenreArg) -> Self {
        match arg {
            GenreArg::Ebook => Genre::Ebook,
            GenreArg::Novel => Genre::Novel,
            GenreArg::KidsStory => Genre::KidsStory,
            GenreArg::ColoringBook => Genre::ColoringBook,
            GenreArg::Audiobook => Genre::Audiobook,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LanguageArg {
    En,
    Fr,
    Es,
    Zh,
    Hi,
    Ja,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::En => Language::En,
            LanguageArg::Fr => Language::Fr,
            LanguageArg::Es => Language::Es,
            LanguageArg::Zh => Language::Zh,
            LanguageArg::Hi => Language::Hi,
            LanguageArg::Ja => Language::Ja,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LengthArg {
    Short,
    Medium,
    Long,
}

impl From<LengthArg> for BookLength {
    fn from(arg: LengthArg) -> Self {
        match arg {
            LengthArg::Short => BookLength::Short,
            LengthArg::Medium => BookLength::Medium,
            LengthArg::Long => BookLength::Long,
        }
    }
}

/// Turn an `AppError` into the message shown to the user.
fn user_error(err: AppError) -> anyhow::Error {
    err.log("Command failed");
    match err.suggested_action() {
        Some(action) if !err.is_recoverable() => {
            anyhow::anyhow!("{} ({})", err.client_message(), action)
        }
        _ => anyhow::anyhow!(err.client_message()),
    }
}

/// Follow a project's progress until it completes or the user presses Ctrl-C.
async fn track(ctx: &AppContext, project_id: &str, json: bool) -> anyhow::Result<()> {
    let mut poll = ctx.track(project_id);
    let mut state = TrackerState::default();
    let mut warned_failure = false;
    let mut interrupted = false;

    loop {
        tokio::select! {
            event = poll.next_event() => {
                let Some(event) = event else { break };
                match &event {
                    TrackerEvent::Snapshot(view) => {
                        if json {
                            println!("{}", serde_json::json!({
                                "overall_progress": view.percent,
                                "current_step": view.current_step,
                            }));
                        } else {
                            for line in progress_lines(view) {
                                println!("{}", line);
                            }
                        }
                        if view.reports_failure() && !warned_failure {
                            warned_failure = true;
                            eprintln!("Generation reported a failure. Press Ctrl-C to return to the dashboard.");
                        }
                    }
                    TrackerEvent::NotFound(message) | TrackerEvent::TransientError(message) => {
                        eprintln!("{}", message);
                    }
                    TrackerEvent::Navigate(route) => {
                        println!("Generation complete: {}", route);
                    }
                }
                state.apply(event);
            }
            _ = tokio::signal::ctrl_c() => {
                interrupted = true;
                break;
            }
        }
    }

    if interrupted {
        poll.stop().await;
        println!("Stopped tracking. Back to {}", Route::Dashboard);
        return Ok(());
    }

    if let Some(Route::Project(id)) = state.navigate_to {
        let editor = ProjectEditor::load(ctx.client.clone(), &id)
            .await
            .map_err(user_error)?;
        let project = editor.project();
        println!("{}", project_row(project));
        println!("{} words", project.word_count());
    }
    Ok(())
}

async fn run(cli: Cli, mut ctx: AppContext) -> anyhow::Result<()> {
    let json = cli.json;

    match cli.command {
        Commands::Login { email, password } => {
            let user = ctx
                .session
                .sign_in(&LoginRequest { email, password })
                .await
                .map_err(user_error)?;
            println!("Signed in as {} ({})", user.display_name(), user.subscription_tier);
        }
        Commands::Register {
            email,
            full_name,
            password,
        } => {
            let user = ctx
                .session
                .register(&RegisterRequest {
                    email,
                    full_name,
                    password,
                })
                .await
                .map_err(user_error)?;
            println!("Welcome, {}", user.display_name());
        }
        Commands::Logout => {
            ctx.session.logout().map_err(user_error)?;
            println!("Signed out");
        }
        Commands::Whoami => match ctx.session.current() {
            Some(user) if json => print_json(user)?,
            Some(user) => println!(
                "{} <{}> tier={}",
                user.display_name(),
                user.email,
                user.subscription_tier
            ),
            None => println!("Not signed in"),
        },
        Commands::Projects { sub } => run_projects(sub, &ctx, json).await?,
        Commands::Track { id } => {
            ctx.session.require_user().map_err(user_error)?;
            track(&ctx, &id, json).await?;
        }
        Commands::Cover { id, style } => {
            ctx.session.require_user().map_err(user_error)?;
            let mut editor = ProjectEditor::load(ctx.client.clone(), &id)
                .await
                .map_err(user_error)?;
            let url = editor.generate_cover(&style).await.map_err(user_error)?;
            println!("{}", url);
        }
        Commands::Audio {
            id,
            voice,
            speed,
            no_track,
        } => {
            ctx.session.require_user().map_err(user_error)?;
            let editor = ProjectEditor::load(ctx.client.clone(), &id)
                .await
                .map_err(user_error)?;
            let options = AudiobookOptions {
                voice_style: voice,
                speed,
            };
            let next = editor.generate_audio(&options).await.map_err(user_error)?;
            println!("Narration started: {}", next);
            if !no_track {
                track(&ctx, &id, json).await?;
            }
        }
        Commands::Plans => {
            let view = PricingView::load(&ctx.client).await.map_err(user_error)?;
            let cards = view.cards();
            if json {
                let rows: Vec<_> = cards
                    .iter()
                    .map(|card| {
                        serde_json::json!({
                            "id": card.id,
                            "name": card.name,
                            "price": card.price_label,
                            "features": card.features,
                            "sold_out": card.sold_out,
                        })
                    })
                    .collect();
                print_json(&rows)?;
            } else {
                for card in cards {
                    println!(
                        "{:<16} {:<20} {}{}",
                        card.id,
                        card.name,
                        card.price_label.as_deref().unwrap_or("-"),
                        if card.sold_out { "  SOLD OUT" } else { "" }
                    );
                    if let Some(availability) = &card.availability {
                        println!("    {}", availability);
                    }
                    for feature in &card.features {
                        println!("    - {}", feature);
                    }
                }
            }
        }
        Commands::Checkout {
            plan_id,
            success_url,
            cancel_url,
        } => {
            ctx.session.require_user().map_err(user_error)?;
            let view = PricingView::load(&ctx.client).await.map_err(user_error)?;
            let redirect = view
                .checkout(&ctx.client, &plan_id, &success_url, &cancel_url)
                .await
                .map_err(user_error)?;
            println!("Open to pay: {}", redirect.url);
        }
        Commands::Payment { session_id } => {
            let summary = payment_summary(&ctx.client, &session_id)
                .await
                .map_err(user_error)?;
            println!(
                "{} {} {}",
                if summary.paid { "Paid" } else { "Not paid" },
                summary.plan_name.as_deref().unwrap_or(""),
                summary.amount_label.as_deref().unwrap_or("")
            );
        }
        Commands::Portal { return_url } => {
            ctx.session.require_user().map_err(user_error)?;
            let url = ctx
                .client
                .create_portal_session(&return_url)
                .await
                .map_err(user_error)?;
            println!("{}", url);
        }
        Commands::Admin => {
            let user = ctx.session.require_user().map_err(user_error)?;
            let view = AdminView::load(&ctx.client, user)
                .await
                .map_err(user_error)?;
            if json {
                print_json(view.stats())?;
            } else {
                let stats = view.stats();
                println!("Users:     {}", stats.total_users);
                println!(
                    "Projects:  {} ({} active, {} completed, {:.0}% completion)",
                    stats.total_projects,
                    stats.active_projects,
                    stats.completed_projects,
                    stats.completion_rate()
                );
                println!("Revenue:   {:.2}", stats.revenue);
                for (genre, count) in view.genre_rows() {
                    println!("  {:<14} {}", genre, count);
                }
            }
        }
        Commands::Titles { sample, genre } => {
            let content_sample = std::fs::read_to_string(&sample)
                .with_context(|| format!("Failed to read {}", sample.display()))?;
            let request = TitleSuggestionRequest {
                content_sample,
                genre: genre.into(),
                style: "engaging".to_string(),
            };
            let titles = ctx
                .client
                .generate_titles(&request)
                .await
                .map_err(user_error)?;
            for title in titles.titles {
                println!("{}", title);
            }
        }
        Commands::Outline {
            title,
            genre,
            summary,
            chapters,
        } => {
            let request = OutlineRequest {
                title,
                genre: genre.into(),
                content_summary: summary,
                num_chapters: chapters,
            };
            let outline = ctx
                .client
                .generate_outline(&request)
                .await
                .map_err(user_error)?;
            print_json(&outline.outline)?;
        }
        Commands::Voices { language } => {
            let voices = ctx
                .client
                .voices(language.map(Language::from))
                .await
                .map_err(user_error)?;
            for (code, names) in voices {
                println!("{}: {}", code, names.join(", "));
            }
        }
        Commands::Styles { genre } => {
            let styles = ctx
                .client
                .cover_styles(genre.into())
                .await
                .map_err(user_error)?;
            for (name, description) in styles {
                println!("{:<14} {}", name, description);
            }
        }
        Commands::Translate { text, to, from } => {
            let request = TranslationRequest {
                text,
                target_language: to.into(),
                source_language: from.map(Language::from),
                preserve_formatting: true,
            };
            let translated = ctx.client.translate(&request).await.map_err(user_error)?;
            if json {
                print_json(&translated)?;
            } else {
                println!("{}", translated.translated_text);
            }
        }
        Commands::Languages => {
            let languages = ctx
                .client
                .translation_languages()
                .await
                .map_err(user_error)?;
            for (code, name) in languages {
                println!("{:<4} {}", code, name);
            }
        }
        Commands::FileTypes => {
            let types = ctx
                .client
                .supported_file_types()
                .await
                .map_err(user_error)?;
            println!(
                "{} (max {} MB): {}",
                types.description,
                types.max_file_size_mb,
                types.extensions.join(", ")
            );
        }
        Commands::Health => {
            let health = ctx.client.health().await.map_err(user_error)?;
            if json {
                print_json(&health)?;
            } else {
                println!("{}", health.status);
                for service in health.unconfigured_services() {
                    println!("  {} not configured", service);
                }
            }
        }
    }

    Ok(())
}

async fn run_projects(sub: ProjectCommands, ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let user = ctx.session.require_user().map_err(user_error)?;

    match sub {
        ProjectCommands::List => {
            let dashboard = Dashboard::load(ctx.client.clone(), user.owner_id())
                .await
                .map_err(user_error)?;
            if json {
                print_json(&dashboard.projects())?;
            } else {
                println!("{}", stats_line(&dashboard.stats()));
                for project in dashboard.projects() {
                    println!("{}", project_row(project));
                }
            }
        }
        ProjectCommands::Show { id, preview } => {
            let editor = ProjectEditor::load(ctx.client.clone(), &id)
                .await
                .map_err(user_error)?;
            let project = editor.project();
            if json {
                print_json(project)?;
            } else {
                println!("{}", project_row(project));
                if !project.author.is_empty() {
                    println!("by {}", project.author);
                }
                if let Some(cover) = &project.cover_image_url {
                    println!("cover: {}", cover);
                }
                if let Some(audio) = project.audio_file_url.as_deref().filter(|_| project.has_audio()) {
                    println!("audio: {}", audio);
                }
                if preview {
                    println!();
                    println!("{}", render_segments(&editor.preview()));
                }
            }
        }
        ProjectCommands::Create {
            title,
            genre,
            language,
            author,
            description,
            prompt,
            file,
            length,
            style,
            no_track,
        } => {
            let source = match prompt {
                Some(prompt) => ContentSource::Prompt {
                    prompt,
                    length: length.into(),
                    style,
                },
                None => ContentSource::Upload(None),
            };
            let mut form = CreatorForm::new(title, genre.into(), source);
            form.author = author;
            form.description = description;
            form.target_language = language.into();

            let creator = ctx.creator().map_err(user_error)?;
            if let Some(path) = file {
                let filename = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .context("Manuscript path has no file name")?
                    .to_string();
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                creator
                    .attach_file(&mut form, &filename, bytes)
                    .await
                    .map_err(user_error)?;
            }

            let submission = creator.submit(&form).await.map_err(user_error)?;
            println!("Created {}", project_row(&submission.project));

            match submission.next {
                Route::Progress(id) if !no_track => track(ctx, &id, json).await?,
                next => println!("Next: {}", next),
            }
        }
        ProjectCommands::Edit {
            id,
            title,
            author,
            description,
            content_file,
        } => {
            let mut editor = ProjectEditor::load(ctx.client.clone(), &id)
                .await
                .map_err(user_error)?;
            let draft = editor.draft_mut();
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(author) = author {
                draft.author = author;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(path) = content_file {
                draft.content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
            }

            if editor.save().await.map_err(user_error)? {
                println!("Saved {}", project_row(editor.project()));
            } else {
                println!("Nothing to save");
            }
        }
        ProjectCommands::Delete { id } => {
            ctx.client.delete_project(&id).await.map_err(user_error)?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("Invalid configuration")?;
    tracing::debug!(api_url = %config.api_url, environment = %config.environment, "Configuration loaded");
    let ctx = AppContext::new(config)
        .map_err(user_error)
        .context("Failed to create API client. Check CHAPTERCRAFT_API_URL (or API_URL)")?;

    run(cli, ctx).await
}
