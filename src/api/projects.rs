use async_trait::async_trait;

use super::{ApiClient, endpoints};
use crate::errors::ApiError;
use crate::models::{CreateProjectRequest, Project, UpdateProjectRequest};

#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Project>, ApiError>;
    async fn get(&self, id: &str) -> Result<Project, ApiError>;
    async fn create(&self, data: &CreateProjectRequest) -> Result<Project, ApiError>;
    async fn update(&self, id: &str, data: &UpdateProjectRequest) -> Result<Project, ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ProjectClient {
    api: ApiClient,
}

impl ProjectClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ProjectApi for ProjectClient {
    async fn list(&self) -> Result<Vec<Project>, ApiError> {
        self.api.get(endpoints::PROJECTS).await
    }

    async fn get(&self, id: &str) -> Result<Project, ApiError> {
        self.api.get(&endpoints::project(id)).await
    }

    async fn create(&self, data: &CreateProjectRequest) -> Result<Project, ApiError> {
        self.api.post(endpoints::PROJECTS, data).await
    }

    async fn update(&self, id: &str, data: &UpdateProjectRequest) -> Result<Project, ApiError> {
        self.api.put(&endpoints::project(id), data).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&endpoints::project(id)).await
    }
}
