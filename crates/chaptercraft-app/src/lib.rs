//! Chaptercraft client application layer
//!
//! The views of the client as plain types: a session store gating protected
//! actions, the project creator, editor and dashboard, the progress tracker,
//! the pricing page and the admin view. A shell (the CLI) owns an
//! [`AppContext`] and drives these.

pub mod admin;
pub mod creator;
pub mod dashboard;
pub mod editor;
pub mod pricing;
pub mod routes;
pub mod session;
pub mod tracker;

use std::sync::Arc;

use chaptercraft_api_client::ApiClient;
use chaptercraft_core::{AppResult, ClientConfig};

pub use creator::{ContentSource, CreatorForm, ProjectCreator};
pub use editor::ProjectEditor;
pub use routes::Route;
pub use session::SessionStore;
pub use tracker::{ProgressPoll, TrackerConfig, TrackerEvent, TrackerState};

/// Everything a shell needs: configuration, the shared client and the session.
pub struct AppContext {
    pub config: ClientConfig,
    pub client: ApiClient,
    pub session: SessionStore,
}

impl AppContext {
    /// Build the client and restore the persisted session before anything else runs.
    pub fn new(config: ClientConfig) -> AppResult<Self> {
        let client = ApiClient::from_config(&config)?;
        let session = SessionStore::open(config.session_file.clone(), client.clone());

        tracing::debug!(
            api_url = %config.api_url,
            signed_in = session.is_signed_in(),
            "Client context ready"
        );

        Ok(Self {
            config,
            client,
            session,
        })
    }

    pub fn creator(&self) -> AppResult<ProjectCreator> {
        let user = self.session.require_user()?;
        Ok(ProjectCreator::new(
            self.client.clone(),
            user.owner_id(),
            self.config.max_upload_bytes(),
        ))
    }

    /// Start tracking a project's generation progress.
    pub fn track(&self, project_id: &str) -> ProgressPoll {
        ProgressPoll::start(
            Arc::new(self.client.clone()),
            project_id,
            TrackerConfig::from(&self.config),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_without_session_gates_creator() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            session_file: dir.path().join("session.json"),
            ..ClientConfig::default()
        };

        let ctx = AppContext::new(config).unwrap();
        assert!(!ctx.session.is_signed_in());
        assert!(ctx.creator().is_err());
    }
}
