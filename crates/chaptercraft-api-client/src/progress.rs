use chaptercraft_core::models::ProgressSnapshot;
use chaptercraft_core::AppResult;

use crate::{api_path, segment, ApiClient};

impl ApiClient {
    /// Current progress of a project's background job.
    pub async fn get_progress(&self, project_id: &str) -> AppResult<ProgressSnapshot> {
        self.get(&api_path(&format!("/progress/{}", segment(project_id))), &[])
            .await
    }
}
