use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub token: String,
    /// ISO timestamp of token expiry
    #[serde(default)]
    pub expiration: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoginOptions {
    pub remember_me: bool,
}

/// Snapshot of the signed-in user persisted next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}
