use async_trait::async_trait;

use super::{ApiClient, endpoints};
use crate::errors::ApiError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError>;
    async fn register(&self, data: &RegisterRequest) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthApi for AuthClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.api.post(endpoints::LOGIN, credentials).await
    }

    async fn register(&self, data: &RegisterRequest) -> Result<(), ApiError> {
        self.api.post_unit(endpoints::REGISTER, data).await
    }
}
