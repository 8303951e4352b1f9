//! Sign-in and registration.

use chaptercraft_core::models::{LoginRequest, RegisterRequest, SessionUser};
use chaptercraft_core::AppResult;

use crate::{api_path, ApiClient};

impl ApiClient {
    /// Exchange credentials for a session user. The backend reads them from the query.
    pub async fn login(&self, request: &LoginRequest) -> AppResult<SessionUser> {
        let query = [
            ("email", request.email.clone()),
            ("password", request.password.clone()),
        ];
        self.post_query(&api_path("/auth/login"), &query).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> AppResult<SessionUser> {
        self.post_json(&api_path("/auth/register"), &[], request)
            .await
    }
}
