use async_trait::async_trait;

use super::{ApiClient, endpoints};
use crate::errors::ApiError;
use crate::models::{CreateTaskRequest, Task, UpdateTaskRequest};

/// Tasks are always addressed through their project.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list(&self, project_id: &str) -> Result<Vec<Task>, ApiError>;
    async fn get(&self, project_id: &str, task_id: &str) -> Result<Task, ApiError>;
    async fn create(&self, project_id: &str, data: &CreateTaskRequest) -> Result<Task, ApiError>;
    async fn update(
        &self,
        project_id: &str,
        task_id: &str,
        data: &UpdateTaskRequest,
    ) -> Result<Task, ApiError>;
    async fn delete(&self, project_id: &str, task_id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct TaskClient {
    api: ApiClient,
}

impl TaskClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl TaskApi for TaskClient {
    async fn list(&self, project_id: &str) -> Result<Vec<Task>, ApiError> {
        self.api.get(&endpoints::tasks(project_id)).await
    }

    async fn get(&self, project_id: &str, task_id: &str) -> Result<Task, ApiError> {
        self.api.get(&endpoints::task(project_id, task_id)).await
    }

    async fn create(&self, project_id: &str, data: &CreateTaskRequest) -> Result<Task, ApiError> {
        self.api.post(&endpoints::tasks(project_id), data).await
    }

    async fn update(
        &self,
        project_id: &str,
        task_id: &str,
        data: &UpdateTaskRequest,
    ) -> Result<Task, ApiError> {
        self.api.put(&endpoints::task(project_id, task_id), data).await
    }

    async fn delete(&self, project_id: &str, task_id: &str) -> Result<(), ApiError> {
        self.api.delete(&endpoints::task(project_id, task_id)).await
    }
}
