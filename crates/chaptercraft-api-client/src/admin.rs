use chaptercraft_core::models::AdminStats;
use chaptercraft_core::AppResult;

use crate::{api_path, ApiClient};

impl ApiClient {
    pub async fn admin_stats(&self) -> AppResult<AdminStats> {
        self.get(&api_path("/admin/stats"), &[]).await
    }
}
