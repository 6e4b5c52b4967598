//! Project collection container.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use super::{LoadingGuard, Tracked};
use crate::api::ProjectApi;
use crate::errors::ApiError;
use crate::models::{
    CreateProjectRequest, Project, ProjectStatus, SortOrder, UpdateProjectRequest,
    matches_search, parse_timestamp,
};
use crate::notify::NotificationCenter;
use crate::routes::{self, Navigator};
use crate::session::SessionStore;

pub const PROJECT_CREATED: &str = "Project created successfully";
pub const PROJECT_UPDATED: &str = "Project updated successfully";
pub const PROJECT_DELETED: &str = "Project deleted successfully";

const LOAD_FAILED: &str = "Failed to load projects";
const LOAD_ONE_FAILED: &str = "Failed to load project";
const CREATE_FAILED: &str = "Failed to create project";
const UPDATE_FAILED: &str = "Failed to update project";
const DELETE_FAILED: &str = "Failed to delete project";

/// Which projects to keep relative to the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    /// Projects the user owns
    Owner,
    /// Every project the user belongs to, owned ones included. The list
    /// endpoint only returns memberships, so this keeps everything.
    Member,
}

impl FromStr for RoleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "owner" => Ok(Self::Owner),
            "member" => Ok(Self::Member),
            _ => Err(format!("Invalid role filter: {s}. Valid values: all, owner, member")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilters {
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub role: RoleFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSort {
    Name,
    Date,
    Members,
}

impl FromStr for ProjectSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "date" => Ok(Self::Date),
            "members" => Ok(Self::Members),
            _ => Err(format!("Invalid sort field: {s}. Valid values: name, date, members")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub total: usize,
    pub owned: usize,
    pub active: usize,
    pub completed: usize,
    pub on_hold: usize,
    pub archived: usize,
}

/// Snapshot of everything the project container owns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectState {
    pub projects: Vec<Project>,
    pub selected: Option<Project>,
    pub in_flight: usize,
    pub error: Option<String>,
    pub filters: ProjectFilters,
}

impl Tracked for ProjectState {
    fn in_flight_mut(&mut self) -> &mut usize {
        &mut self.in_flight
    }

    fn error_mut(&mut self) -> &mut Option<String> {
        &mut self.error
    }
}

impl ProjectState {
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Projects passing the current filters, in collection order.
    pub fn filtered(&self, user_id: Option<&str>) -> Vec<Project> {
        let filters = &self.filters;
        self.projects
            .iter()
            .filter(|p| match &filters.search {
                Some(term) => matches_search(
                    term,
                    [
                        Some(p.name.as_str()),
                        p.description.as_deref(),
                        p.owner_name.as_deref(),
                    ],
                ),
                None => true,
            })
            .filter(|p| filters.status.is_none_or(|status| p.status == status))
            .filter(|p| match filters.role {
                RoleFilter::All => true,
                RoleFilter::Owner => user_id == Some(p.owner_id.as_str()),
                RoleFilter::Member => true,
            })
            .cloned()
            .collect()
    }

    pub fn owned(&self, user_id: Option<&str>) -> Vec<Project> {
        self.projects
            .iter()
            .filter(|p| user_id == Some(p.owner_id.as_str()))
            .cloned()
            .collect()
    }

    /// In progress or on hold.
    pub fn active(&self) -> Vec<Project> {
        self.projects
            .iter()
            .filter(|p| p.status.is_active())
            .cloned()
            .collect()
    }

    pub fn stats(&self, user_id: Option<&str>) -> ProjectStats {
        let count = |status: ProjectStatus| {
            self.projects
                .iter()
                .filter(|p| p.status == status)
                .count()
        };
        ProjectStats {
            total: self.projects.len(),
            owned: self.owned(user_id).len(),
            active: self.active().len(),
            completed: count(ProjectStatus::Completed),
            on_hold: count(ProjectStatus::OnHold),
            archived: count(ProjectStatus::Archived),
        }
    }
}

/// Stable sort of `projects`; ties keep their input order.
pub fn sort_projects(projects: &[Project], by: ProjectSort, order: SortOrder) -> Vec<Project> {
    let mut sorted = projects.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match by {
            ProjectSort::Name => compare_names(&a.name, &b.name),
            ProjectSort::Date => {
                parse_timestamp(&a.creation_date).cmp(&parse_timestamp(&b.creation_date))
            }
            ProjectSort::Members => a.members_count.cmp(&b.members_count),
        };
        order.apply(ordering)
    });
    sorted
}

pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

struct Inner {
    tx: watch::Sender<ProjectState>,
    api: Arc<dyn ProjectApi>,
    session: SessionStore,
    notifications: NotificationCenter,
    navigator: Arc<dyn Navigator>,
}

/// Owner of the loaded projects, the selected project, and list filters.
#[derive(Clone)]
pub struct ProjectStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectStore")
            .field("state", &*self.inner.tx.borrow())
            .finish_non_exhaustive()
    }
}

impl ProjectStore {
    pub fn new(
        api: Arc<dyn ProjectApi>,
        session: SessionStore,
        notifications: NotificationCenter,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (tx, _rx) = watch::channel(ProjectState::default());
        Self {
            inner: Arc::new(Inner {
                tx,
                api,
                session,
                notifications,
                navigator,
            }),
        }
    }

    pub fn state(&self) -> ProjectState {
        self.inner.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProjectState> {
        self.inner.tx.subscribe()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.inner.tx.borrow().projects.clone()
    }

    pub fn selected(&self) -> Option<Project> {
        self.inner.tx.borrow().selected.clone()
    }

    pub fn loading(&self) -> bool {
        self.inner.tx.borrow().loading()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.tx.borrow().error.clone()
    }

    pub fn count(&self) -> usize {
        self.inner.tx.borrow().projects.len()
    }

    /// Replace the collection with the backend's list.
    pub async fn load(&self) -> Result<(), ApiError> {
        let guard = LoadingGuard::start(&self.inner.tx);
        match self.inner.api.list().await {
            Ok(projects) => {
                debug!(count = projects.len(), "Projects loaded");
                self.inner.tx.send_modify(|s| s.projects = projects);
                Ok(())
            }
            Err(err) => {
                guard.fail(&err, LOAD_FAILED);
                Err(err)
            }
        }
    }

    /// Fetch one project, select it, and refresh its entry if already listed.
    pub async fn load_one(&self, id: &str) -> Result<Project, ApiError> {
        let guard = LoadingGuard::start(&self.inner.tx);
        match self.inner.api.get(id).await {
            Ok(project) => {
                self.inner.tx.send_modify(|s| {
                    replace_by_id(&mut s.projects, &project);
                    s.selected = Some(project.clone());
                });
                Ok(project)
            }
            Err(err) => {
                guard.fail(&err, LOAD_ONE_FAILED);
                Err(err)
            }
        }
    }

    pub async fn create(&self, data: &CreateProjectRequest) -> Result<Project, ApiError> {
        let guard = LoadingGuard::start(&self.inner.tx);
        match self.inner.api.create(data).await {
            Ok(project) => {
                debug!(id = %project.id, "Project created");
                self.inner.tx.send_modify(|s| s.projects.push(project.clone()));
                self.inner.notifications.success(PROJECT_CREATED);
                Ok(project)
            }
            Err(err) => {
                guard.fail(&err, CREATE_FAILED);
                Err(err)
            }
        }
    }

    pub async fn update(&self, id: &str, data: &UpdateProjectRequest) -> Result<Project, ApiError> {
        let guard = LoadingGuard::start(&self.inner.tx);
        match self.inner.api.update(id, data).await {
            Ok(project) => {
                self.inner.tx.send_modify(|s| {
                    replace_by_id(&mut s.projects, &project);
                    if s.selected.as_ref().is_some_and(|sel| sel.id == id) {
                        s.selected = Some(project.clone());
                    }
                });
                self.inner.notifications.success(PROJECT_UPDATED);
                Ok(project)
            }
            Err(err) => {
                guard.fail(&err, UPDATE_FAILED);
                Err(err)
            }
        }
    }

    /// Delete a project, then return to the project list.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let guard = LoadingGuard::start(&self.inner.tx);
        match self.inner.api.delete(id).await {
            Ok(()) => {
                self.inner.tx.send_modify(|s| {
                    s.projects.retain(|p| p.id != id);
                    if s.selected.as_ref().is_some_and(|sel| sel.id == id) {
                        s.selected = None;
                    }
                });
                self.inner.notifications.success(PROJECT_DELETED);
                self.inner.navigator.navigate(routes::PROJECTS);
                Ok(())
            }
            Err(err) => {
                guard.fail(&err, DELETE_FAILED);
                Err(err)
            }
        }
    }

    pub fn set_filters(&self, filters: ProjectFilters) {
        self.inner.tx.send_modify(|s| s.filters = filters);
    }

    pub fn clear_filters(&self) {
        self.set_filters(ProjectFilters::default());
    }

    pub fn clear_selected(&self) {
        self.inner.tx.send_if_modified(|s| s.selected.take().is_some());
    }

    /// Re-fetch the selected project. Does nothing when none is selected.
    pub async fn reload_selected(&self) -> Result<(), ApiError> {
        let Some(id) = self.inner.tx.borrow().selected.as_ref().map(|p| p.id.clone()) else {
            return Ok(());
        };
        self.load_one(&id).await.map(drop)
    }

    /// Forget everything, e.g. after the user signs out.
    pub fn reset(&self) {
        self.inner.tx.send_replace(ProjectState::default());
    }

    pub fn filtered(&self) -> Vec<Project> {
        self.inner.tx.borrow().filtered(self.user_id().as_deref())
    }

    pub fn owned(&self) -> Vec<Project> {
        self.inner.tx.borrow().owned(self.user_id().as_deref())
    }

    pub fn active(&self) -> Vec<Project> {
        self.inner.tx.borrow().active()
    }

    pub fn stats(&self) -> ProjectStats {
        self.inner.tx.borrow().stats(self.user_id().as_deref())
    }

    fn user_id(&self) -> Option<String> {
        self.inner.session.user_id()
    }
}

fn replace_by_id(projects: &mut [Project], project: &Project) {
    if let Some(slot) = projects.iter_mut().find(|p| p.id == project.id) {
        *slot = project.clone();
    }
}
