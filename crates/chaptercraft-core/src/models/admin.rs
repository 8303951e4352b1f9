use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_projects: u64,
    #[serde(default)]
    pub active_projects: u64,
    #[serde(default)]
    pub completed_projects: u64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub popular_genres: BTreeMap<String, u64>,
}

impl AdminStats {
    /// Genres by descending project count; ties keep name order.
    pub fn genres_by_popularity(&self) -> Vec<(&str, u64)> {
        let mut genres: Vec<(&str, u64)> = self
            .popular_genres
            .iter()
            .map(|(genre, count)| (genre.as_str(), *count))
            .collect();
        genres.sort_by(|a, b| b.1.cmp(&a.1));
        genres
    }

    /// Share of projects that completed, as a percentage.
    pub fn completion_rate(&self) -> f64 {
        if self.total_projects == 0 {
            0.0
        } else {
            self.completed_projects as f64 * 100.0 / self.total_projects as f64
        }
    }
}
