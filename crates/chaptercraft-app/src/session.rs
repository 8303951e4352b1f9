//! Session store
//!
//! Holds the signed-in user and keeps three things in step: the in-memory
//! record, the session file on disk, and the bearer credential of the shared
//! [`ApiClient`]. There is no refresh or expiry handling. A 401 from the backend
//! leaves the session untouched.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chaptercraft_api_client::ApiClient;
use chaptercraft_core::models::{LoginRequest, RegisterRequest, SessionUser};
use chaptercraft_core::{AppError, AppResult};
use validator::Validate;

pub struct SessionStore {
    path: PathBuf,
    client: ApiClient,
    user: Option<SessionUser>,
}

impl SessionStore {
    /// Open the store and restore any persisted session into `client`.
    ///
    /// A missing or unreadable file means nobody is signed in.
    pub fn open(path: impl Into<PathBuf>, client: ApiClient) -> Self {
        let path = path.into();
        let user = read_session(&path);

        match &user {
            Some(user) => {
                if user.has_token() {
                    client.set_bearer(&user.access_token);
                } else {
                    client.clear_auth();
                }
                tracing::debug!(email = %user.email, path = %path.display(), "Session restored");
            }
            None => client.clear_auth(),
        }

        Self { path, client, user }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// The signed-in user, or an error for protected actions.
    pub fn require_user(&self) -> AppResult<&SessionUser> {
        self.user
            .as_ref()
            .ok_or_else(|| AppError::Session("Please sign in to continue".to_string()))
    }

    /// Store `user` as the current session and start sending its token.
    pub fn login(&mut self, user: SessionUser) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&user)
            .map_err(|e| AppError::Session(format!("Failed to serialize session: {}", e)))?;
        write_private(&self.path, &json)?;

        if user.has_token() {
            self.client.set_bearer(&user.access_token);
        } else {
            self.client.clear_auth();
        }

        tracing::info!(email = %user.email, tier = %user.subscription_tier, "Signed in");
        self.user = Some(user);
        Ok(())
    }

    /// Forget the session in memory, on disk and on the client.
    pub fn logout(&mut self) -> AppResult<()> {
        self.client.clear_auth();
        let previous = self.user.take();

        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        if let Some(user) = previous {
            tracing::info!(email = %user.email, "Signed out");
        }
        Ok(())
    }

    /// Validate credentials, sign in against the backend and persist the result.
    pub async fn sign_in(&mut self, request: &LoginRequest) -> AppResult<&SessionUser> {
        request.validate()?;
        let user = self.client.login(request).await?;
        self.login(user)?;
        self.require_user()
    }

    /// Create an account, then sign in with the same credentials.
    pub async fn register(&mut self, request: &RegisterRequest) -> AppResult<&SessionUser> {
        request.validate()?;
        let created = self.client.register(request).await?;
        tracing::info!(email = %created.email, "Account registered");

        let login = LoginRequest {
            email: request.email.clone(),
            password: request.password.clone(),
        };
        self.sign_in(&login).await
    }
}

/// Write the session file readable by the owner only; it holds the bearer token.
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // `mode` only applies on creation; tighten a file left by an older write.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}

fn read_session(path: &Path) -> Option<SessionUser> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "Failed to read session file");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "Ignoring unreadable session file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::time::Duration;

    fn client(url: &str) -> ApiClient {
        ApiClient::new(url, Duration::from_secs(5)).unwrap()
    }

    fn user(token: &str) -> SessionUser {
        serde_json::from_value(serde_json::json!({
            "user_id": "u-1",
            "access_token": token,
            "email": "a@b.com"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_session_survives_restart_and_sends_bearer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/projects/u-1")
            .match_header("authorization", "Bearer t")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let mut store = SessionStore::open(&path, client(&server.url()));
        assert!(!store.is_signed_in());
        store.login(user("t")).unwrap();

        let fresh_client = client(&server.url());
        let restored = SessionStore::open(&path, fresh_client.clone());
        assert_eq!(restored.current().unwrap().email, "a@b.com");
        assert!(fresh_client.is_authenticated());

        let projects = fresh_client
            .list_projects(restored.require_user().unwrap().owner_id())
            .await
            .unwrap();
        assert!(projects.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_logout_removes_header_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/health")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"status":"healthy"}"#)
            .create_async()
            .await;

        let api = client(&server.url());
        let mut store = SessionStore::open(&path, api.clone());
        store.login(user("t")).unwrap();
        store.logout().unwrap();

        assert!(!path.exists());
        assert!(store.require_user().is_err());
        api.health().await.unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_corrupt_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let api = client("http://localhost:8001");
        api.set_bearer("leftover");
        let store = SessionStore::open(&path, api.clone());
        assert!(!store.is_signed_in());
        assert!(!api.is_authenticated());
    }

    #[test]
    #[cfg(unix)]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut store = SessionStore::open(&path, client("http://localhost:8001"));
        store.login(user("t")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_restored_session_without_token_drops_old_bearer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"email":"a@b.com","access_token":""}"#).unwrap();

        let api = client("http://localhost:8001");
        api.set_bearer("leftover");
        let store = SessionStore::open(&path, api.clone());
        assert!(store.is_signed_in());
        assert!(!api.is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_in_validates_before_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/login")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let mut store = SessionStore::open(dir.path().join("s.json"), client(&server.url()));
        let err = store
            .sign_in(&LoginRequest {
                email: "nope".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.is_local_validation());
        mock.assert_async().await;
    }
}
