//! Project CRUD.

use chaptercraft_core::models::{Project, ProjectCreate, ProjectUpdate};
use chaptercraft_core::AppResult;

use crate::{api_path, segment, ApiClient};

impl ApiClient {
    /// Create a project owned by `user_id`.
    pub async fn create_project(&self, user_id: &str, project: &ProjectCreate) -> AppResult<Project> {
        let created: Project = self
            .post_json(
                &api_path("/projects"),
                &[("user_id", user_id.to_string())],
                project,
            )
            .await?;
        tracing::info!(project_id = %created.id, title = %created.title, "Project created");
        Ok(created)
    }

    /// All projects owned by `user_id`.
    pub async fn list_projects(&self, user_id: &str) -> AppResult<Vec<Project>> {
        self.get(&api_path(&format!("/projects/{}", segment(user_id))), &[])
            .await
    }

    pub async fn get_project(&self, project_id: &str) -> AppResult<Project> {
        self.get(
            &api_path(&format!("/projects/detail/{}", segment(project_id))),
            &[],
        )
        .await
    }

    pub async fn update_project(&self, project_id: &str, update: &ProjectUpdate) -> AppResult<Project> {
        self.put_json(&api_path(&format!("/projects/{}", segment(project_id))), update)
            .await
    }

    pub async fn delete_project(&self, project_id: &str) -> AppResult<()> {
        self.delete(&api_path(&format!("/projects/{}", segment(project_id))))
            .await?;
        tracing::info!(project_id = %project_id, "Project deleted");
        Ok(())
    }
}
