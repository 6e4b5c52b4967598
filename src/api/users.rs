use async_trait::async_trait;

use super::{ApiClient, endpoints};
use crate::errors::ApiError;
use crate::models::{
    ChangePasswordRequest, ManageRolesRequest, UpdateProfileRequest, UserDto, UserProfile,
    UserSearchResult,
};

#[async_trait]
pub trait UserApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<UserSearchResult>, ApiError>;
    async fn profile(&self) -> Result<UserProfile, ApiError>;
    async fn update_profile(&self, data: &UpdateProfileRequest) -> Result<UserProfile, ApiError>;
    async fn change_password(&self, data: &ChangePasswordRequest) -> Result<(), ApiError>;
    async fn delete_profile_image(&self) -> Result<(), ApiError>;

    // Admin only
    async fn list_all(&self) -> Result<Vec<UserDto>, ApiError>;
    async fn get(&self, user_id: &str) -> Result<UserDto, ApiError>;
    async fn manage_roles(&self, user_id: &str, data: &ManageRolesRequest)
    -> Result<(), ApiError>;
    async fn delete(&self, user_id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct UserClient {
    api: ApiClient,
}

impl UserClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl UserApi for UserClient {
    async fn search(&self, query: &str) -> Result<Vec<UserSearchResult>, ApiError> {
        self.api
            .get_with_query(endpoints::USER_SEARCH, &[("q", query)])
            .await
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.api.get(endpoints::ME).await
    }

    async fn update_profile(&self, data: &UpdateProfileRequest) -> Result<UserProfile, ApiError> {
        self.api.put(endpoints::ME, data).await
    }

    async fn change_password(&self, data: &ChangePasswordRequest) -> Result<(), ApiError> {
        self.api.post_unit(endpoints::CHANGE_PASSWORD, data).await
    }

    async fn delete_profile_image(&self) -> Result<(), ApiError> {
        self.api.delete(endpoints::PROFILE_IMAGE).await
    }

    async fn list_all(&self) -> Result<Vec<UserDto>, ApiError> {
        self.api.get(endpoints::USERS).await
    }

    async fn get(&self, user_id: &str) -> Result<UserDto, ApiError> {
        self.api.get(&endpoints::user(user_id)).await
    }

    async fn manage_roles(
        &self,
        user_id: &str,
        data: &ManageRolesRequest,
    ) -> Result<(), ApiError> {
        self.api.put_unit(&endpoints::user_roles(user_id), data).await
    }

    async fn delete(&self, user_id: &str) -> Result<(), ApiError> {
        self.api.delete(&endpoints::user(user_id)).await
    }
}
