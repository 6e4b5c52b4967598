//! Session state container.
//!
//! [`SessionStore`] owns the authenticated identity and is the only writer of
//! it. Readers observe through [`SessionStore::subscribe`] or the query
//! methods. Transitions that need the backend live in [`SessionManager`].

pub mod manager;

pub use manager::SessionManager;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::models::user::{ADMIN_ROLE, USER_ROLE};
use crate::models::{AuthResponse, CurrentUser, LoginOptions};
use crate::notify::NotificationCenter;
use crate::routes::{self, Navigator};
use crate::storage::{Storage, keys};
use crate::token::TokenCodec;

pub const SESSION_EXPIRED_NOTICE: &str = crate::api::interceptor::SESSION_EXPIRED;
pub const SIGNED_OUT_NOTICE: &str = "Signed out successfully";

/// An authenticated identity. Identity and token are always set together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub roles: Vec<String>,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        !self.user_id.is_empty() && !self.token.is_empty() && now < self.expires_at
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated(Session),
    AuthError(String),
}

struct Inner {
    tx: watch::Sender<SessionState>,
    storage: Storage,
    codec: TokenCodec,
    notifications: NotificationCenter,
    navigator: Arc<dyn Navigator>,
}

/// Owner of the current session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.inner.tx.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(
        storage: Storage,
        codec: TokenCodec,
        notifications: NotificationCenter,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (tx, _rx) = watch::channel(SessionState::Unauthenticated);
        Self {
            inner: Arc::new(Inner {
                tx,
                storage,
                codec,
                notifications,
                navigator,
            }),
        }
    }

    /// Restore the session from storage. Call once at startup.
    pub fn initialize(&self) {
        self.initialize_at(Utc::now());
    }

    pub fn initialize_at(&self, now: DateTime<Utc>) {
        let Some(token) = self.inner.storage.get::<String>(keys::AUTH_TOKEN) else {
            self.clear();
            return;
        };

        if self.inner.codec.is_expired_at(&token, now) {
            info!("Stored token has expired");
            self.clear();
            self.inner.notifications.info(SESSION_EXPIRED_NOTICE);
            return;
        }

        match self.session_from_token(&token) {
            Some(session) => {
                info!(user_id = %session.user_id, "Session restored");
                self.inner.tx.send_replace(SessionState::Authenticated(session));
            }
            None => {
                warn!("Stored token is missing user claims; discarding it");
                self.clear();
            }
        }
    }

    fn session_from_token(&self, token: &str) -> Option<Session> {
        let codec = &self.inner.codec;
        let user_id = codec.extract_subject_id(token)?;
        let username = codec.extract_display_name(token)?;
        let expires_at = codec.expires_at(token)?;
        Some(Session {
            user_id,
            username,
            roles: codec.extract_roles(token),
            token: token.to_string(),
            expires_at,
        })
    }

    pub(crate) fn begin_authenticating(&self) {
        self.inner.tx.send_replace(SessionState::Authenticating);
    }

    /// Commit a successful login: persist, publish, and greet.
    pub(crate) fn commit_login(
        &self,
        response: &AuthResponse,
        expires_at: DateTime<Utc>,
        options: LoginOptions,
    ) -> Session {
        let session = Session {
            user_id: response.user_id.clone(),
            username: response.username.clone(),
            roles: response.roles.clone(),
            token: response.token.clone(),
            expires_at,
        };

        let storage = &self.inner.storage;
        storage.set(keys::AUTH_TOKEN, &session.token);
        storage.set(
            keys::CURRENT_USER,
            &CurrentUser {
                id: session.user_id.clone(),
                username: session.username.clone(),
                roles: session.roles.clone(),
            },
        );
        if options.remember_me {
            storage.set(keys::REMEMBER_ME, &true);
        }

        info!(user_id = %session.user_id, "Logged in");
        self.inner
            .tx
            .send_replace(SessionState::Authenticated(session.clone()));
        self.inner
            .notifications
            .success(format!("Welcome, {}!", session.username));
        session
    }

    /// Publish a login failure. Any previously persisted identity is purged
    /// so a later `initialize` cannot restore it.
    pub(crate) fn fail(&self, message: impl Into<String>) {
        for key in keys::SESSION {
            self.inner.storage.remove(key);
        }
        self.inner.tx.send_replace(SessionState::AuthError(message.into()));
    }

    /// Sign out. Always succeeds.
    pub fn logout(&self) {
        self.clear();
        info!("Logged out");
        self.inner.notifications.info(SIGNED_OUT_NOTICE);
        self.inner.navigator.navigate(routes::LOGIN);
    }

    /// Drop the session after the backend rejected it. The caller reports why.
    pub fn end_session(&self) {
        self.clear();
        info!("Session ended by the backend");
        self.inner.navigator.navigate(routes::LOGIN);
    }

    fn clear(&self) {
        for key in keys::SESSION {
            self.inner.storage.remove(key);
        }
        self.inner.tx.send_replace(SessionState::Unauthenticated);
    }

    pub fn state(&self) -> SessionState {
        self.inner.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.tx.subscribe()
    }

    /// The current session, if one is committed (it may have expired).
    pub fn session(&self) -> Option<Session> {
        match &*self.inner.tx.borrow() {
            SessionState::Authenticated(session) => Some(session.clone()),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        matches!(&*self.inner.tx.borrow(), SessionState::Authenticated(s) if s.is_live_at(now))
    }

    /// True while a login is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(&*self.inner.tx.borrow(), SessionState::Authenticating)
    }

    pub fn error(&self) -> Option<String> {
        match &*self.inner.tx.borrow() {
            SessionState::AuthError(message) => Some(message.clone()),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.session().map(|s| s.token)
    }

    pub fn user_id(&self) -> Option<String> {
        self.session().map(|s| s.user_id)
    }

    pub fn username(&self) -> Option<String> {
        self.session().map(|s| s.username)
    }

    pub fn roles(&self) -> Vec<String> {
        self.session().map(|s| s.roles).unwrap_or_default()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r == role)
    }

    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        let held = self.roles();
        roles.iter().any(|want| held.iter().any(|r| r == want.as_ref()))
    }

    pub fn has_all_roles<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        let held = self.roles();
        roles.iter().all(|want| held.iter().any(|r| r == want.as_ref()))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    pub fn is_user(&self) -> bool {
        self.has_role(USER_ROLE)
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.inner.codec
    }

    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.inner.notifications
    }
}
