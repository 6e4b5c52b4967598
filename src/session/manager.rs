//! Session transitions that call the backend.

use std::sync::Arc;
use tracing::{debug, warn};

use super::{Session, SessionStore};
use crate::api::AuthApi;
use crate::errors::SessionError;
use crate::models::{LoginOptions, LoginRequest, RegisterRequest, parse_timestamp};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const ACCOUNT_CREATED: &str = "Account created successfully. You can now log in.";
const MISSING_EXPIRY: &str = "The server returned a token without an expiry";

/// Drives login, registration, and logout against the auth endpoints.
#[derive(Clone)]
pub struct SessionManager {
    store: SessionStore,
    auth: Arc<dyn AuthApi>,
}

impl SessionManager {
    pub fn new(store: SessionStore, auth: Arc<dyn AuthApi>) -> Self {
        Self { store, auth }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Log in. On failure the session moves to `AuthError` and the error is returned.
    pub async fn login(
        &self,
        credentials: &LoginRequest,
        options: LoginOptions,
    ) -> Result<Session, SessionError> {
        debug!(username = %credentials.username, "Logging in");
        self.store.begin_authenticating();

        let response = match self.auth.login(credentials).await {
            Ok(response) => response,
            Err(err) => {
                self.store.fail(err.message_or(INVALID_CREDENTIALS));
                return Err(err.into());
            }
        };

        // Prefer the token's own claim; fall back to the response body.
        let expires_at = self.store.codec().expires_at(&response.token).or_else(|| {
            response
                .expiration
                .as_deref()
                .and_then(parse_timestamp)
        });
        let Some(expires_at) = expires_at else {
            warn!("Login response carried no usable expiry");
            self.store.fail(MISSING_EXPIRY);
            return Err(SessionError::MissingExpiry);
        };

        Ok(self.store.commit_login(&response, expires_at, options))
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, data: &RegisterRequest) -> Result<(), SessionError> {
        debug!(username = %data.username, "Registering");
        self.auth.register(data).await?;
        self.store.notifications().success(ACCOUNT_CREATED);
        Ok(())
    }

    pub fn logout(&self) {
        self.store.logout();
    }
}
