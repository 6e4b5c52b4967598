use async_trait::async_trait;

use super::{ApiClient, endpoints};
use crate::errors::ApiError;
use crate::models::{AddMemberRequest, ProjectMember, UpdateMemberRoleRequest};

#[async_trait]
pub trait MemberApi: Send + Sync {
    async fn list(&self, project_id: &str) -> Result<Vec<ProjectMember>, ApiError>;
    async fn add(&self, project_id: &str, data: &AddMemberRequest)
    -> Result<ProjectMember, ApiError>;
    async fn update_role(
        &self,
        project_id: &str,
        user_id: &str,
        data: &UpdateMemberRoleRequest,
    ) -> Result<(), ApiError>;
    async fn remove(&self, project_id: &str, user_id: &str) -> Result<(), ApiError>;
    /// Leave a project as the signed-in user.
    async fn leave(&self, project_id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct MemberClient {
    api: ApiClient,
}

impl MemberClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl MemberApi for MemberClient {
    async fn list(&self, project_id: &str) -> Result<Vec<ProjectMember>, ApiError> {
        self.api.get(&endpoints::members(project_id)).await
    }

    async fn add(
        &self,
        project_id: &str,
        data: &AddMemberRequest,
    ) -> Result<ProjectMember, ApiError> {
        self.api.post(&endpoints::members(project_id), data).await
    }

    async fn update_role(
        &self,
        project_id: &str,
        user_id: &str,
        data: &UpdateMemberRoleRequest,
    ) -> Result<(), ApiError> {
        self.api
            .put_unit(&endpoints::member(project_id, user_id), data)
            .await
    }

    async fn remove(&self, project_id: &str, user_id: &str) -> Result<(), ApiError> {
        self.api.delete(&endpoints::member(project_id, user_id)).await
    }

    async fn leave(&self, project_id: &str) -> Result<(), ApiError> {
        self.api
            .post_unit(&endpoints::leave(project_id), &serde_json::json!({}))
            .await
    }
}
