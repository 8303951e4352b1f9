//! Dashboard: the signed-in user's projects and their counts.

use chaptercraft_api_client::ApiClient;
use chaptercraft_core::models::{Project, ProjectStatus};
use chaptercraft_core::AppResult;

/// Project counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub total: usize,
    pub drafts: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

impl ProjectStats {
    pub fn from_projects(projects: &[Project]) -> Self {
        projects.iter().fold(Self::default(), |mut stats, project| {
            stats.total += 1;
            match project.status {
                ProjectStatus::Draft => stats.drafts += 1,
                ProjectStatus::Processing => stats.processing += 1,
                ProjectStatus::Completed => stats.completed += 1,
                ProjectStatus::Failed => stats.failed += 1,
            }
            stats
        })
    }
}

pub struct Dashboard {
    client: ApiClient,
    owner_id: String,
    projects: Vec<Project>,
}

impl Dashboard {
    pub async fn load(client: ApiClient, owner_id: &str) -> AppResult<Self> {
        let mut projects = client.list_projects(owner_id).await?;
        // Newest first; projects without timestamps go last.
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tracing::debug!(owner_id = %owner_id, count = projects.len(), "Dashboard loaded");

        Ok(Self {
            client,
            owner_id: owner_id.to_string(),
            projects,
        })
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn stats(&self) -> ProjectStats {
        ProjectStats::from_projects(&self.projects)
    }

    /// Delete a project and drop it from the list.
    pub async fn delete(&mut self, project_id: &str) -> AppResult<()> {
        self.client.delete_project(project_id).await?;
        self.projects.retain(|p| p.id != project_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_stats_and_delete() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/projects/u-1")
            .with_status(200)
            .with_body(
                r#"[
                {"id":"a","title":"A","settings":{"genre":"novel"},"status":"completed","created_at":"2025-01-01T10:00:00"},
                {"id":"b","title":"B","settings":{"genre":"ebook"},"status":"processing","created_at":"2025-03-01T10:00:00Z"},
                {"id":"c","title":"C","settings":{"genre":"ebook"},"status":"pending"},
                {"id":"d","title":"D","settings":{"genre":"audiobook"},"status":"failed","created_at":"2025-02-01T10:00:00"}
            ]"#,
            )
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/api/projects/b")
            .with_status(200)
            .with_body(r#"{"message":"Project deleted"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        let mut dashboard = Dashboard::load(client, "u-1").await.unwrap();

        let ids: Vec<&str> = dashboard.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
        assert_eq!(
            dashboard.stats(),
            ProjectStats {
                total: 4,
                drafts: 1,
                processing: 1,
                completed: 1,
                failed: 1
            }
        );

        dashboard.delete("b").await.unwrap();
        delete.assert_async().await;
        assert_eq!(dashboard.stats().total, 3);
        assert_eq!(dashboard.stats().processing, 0);
    }
}
