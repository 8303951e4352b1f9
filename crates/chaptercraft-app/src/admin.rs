//! Read-only admin statistics.

use chaptercraft_api_client::ApiClient;
use chaptercraft_core::models::{AdminStats, SessionUser};
use chaptercraft_core::{AppError, AppResult};

pub struct AdminView {
    stats: AdminStats,
}

impl AdminView {
    /// Load statistics. Only admin sessions may open this view.
    pub async fn load(client: &ApiClient, user: &SessionUser) -> AppResult<Self> {
        if !user.subscription_tier.is_admin() {
            return Err(AppError::Unauthorized("Admin access required".to_string()));
        }
        let stats = client.admin_stats().await?;
        Ok(Self { stats })
    }

    pub fn stats(&self) -> &AdminStats {
        &self.stats
    }

    /// Genre rows as `(label, count)`, most popular first.
    pub fn genre_rows(&self) -> Vec<(String, u64)> {
        self.stats
            .genres_by_popularity()
            .into_iter()
            .map(|(genre, count)| {
                let label = genre
                    .parse::<chaptercraft_core::models::Genre>()
                    .map(|g| g.label().to_string())
                    .unwrap_or_else(|_| genre.to_string());
                (label, count)
            })
            .collect()
    }
}
