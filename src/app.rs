//! Explicit wiring of every container.
//!
//! Nothing in the crate is ambient: each component receives the handles it
//! needs here, and callers reach state only through an [`App`].

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::activity::ActivityCounter;
use crate::api::{
    ApiClient, AuthClient, MemberApi, MemberClient, ProjectClient, TaskClient, UserApi, UserClient,
};
use crate::config::TaskdeckConfig;
use crate::notify::NotificationCenter;
use crate::routes::RecordingNavigator;
use crate::session::{SessionManager, SessionStore};
use crate::state::{ProjectStore, TaskStore};
use crate::storage::backend::FileBackend;
use crate::storage::{Preferences, Storage};
use crate::token::TokenCodec;

pub struct App {
    pub config: TaskdeckConfig,
    pub storage: Storage,
    pub preferences: Preferences,
    pub notifications: NotificationCenter,
    pub activity: ActivityCounter,
    pub navigator: Arc<RecordingNavigator>,
    pub session: SessionStore,
    pub api: ApiClient,
    pub auth: SessionManager,
    pub projects: ProjectStore,
    pub tasks: TaskStore,
    pub members: Arc<dyn MemberApi>,
    pub users: Arc<dyn UserApi>,
}

impl App {
    /// Wire everything over file-backed storage in the configured data directory.
    pub fn build(config: TaskdeckConfig) -> Result<Self> {
        let backend = FileBackend::new(&config.data_dir());
        Self::with_storage(config, Storage::new(Arc::new(backend)))
    }

    pub fn with_storage(config: TaskdeckConfig, storage: Storage) -> Result<Self> {
        let notifications = NotificationCenter::new(
            config.default_notification_duration(),
            config.toml.notifications.max_active,
        );
        let activity = ActivityCounter::new();
        let navigator = Arc::new(RecordingNavigator::new());
        let codec = TokenCodec::new(config.claim_keys().clone());

        let session = SessionStore::new(
            storage.clone(),
            codec,
            notifications.clone(),
            navigator.clone(),
        );
        session.initialize();

        let api = ApiClient::new(
            config.base_url(),
            config.timeout(),
            session.clone(),
            activity.clone(),
            notifications.clone(),
        )
        .context("Failed to build HTTP client")?;

        let auth = SessionManager::new(session.clone(), Arc::new(AuthClient::new(api.clone())));
        let projects = ProjectStore::new(
            Arc::new(ProjectClient::new(api.clone())),
            session.clone(),
            notifications.clone(),
            navigator.clone(),
        );
        let tasks = TaskStore::new(
            Arc::new(TaskClient::new(api.clone())),
            session.clone(),
            notifications.clone(),
        );

        Ok(Self {
            preferences: Preferences::new(storage.clone()),
            members: Arc::new(MemberClient::new(api.clone())),
            users: Arc::new(UserClient::new(api.clone())),
            config,
            storage,
            notifications,
            activity,
            navigator,
            session,
            api,
            auth,
            projects,
            tasks,
        })
    }
}
