//! Task collection container for one project at a time.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use super::projects::compare_names;
use super::{LoadingGuard, Tracked};
use crate::api::TaskApi;
use crate::errors::ApiError;
use crate::models::{
    CreateTaskRequest, SortOrder, Task, TaskPriority, TaskStatus, UpdateTaskRequest,
    matches_search, parse_timestamp,
};
use crate::notify::NotificationCenter;
use crate::session::SessionStore;

pub const TASK_CREATED: &str = "Task created successfully";
pub const TASK_UPDATED: &str = "Task updated successfully";
pub const TASK_DELETED: &str = "Task deleted successfully";
pub const TASK_COMPLETED: &str = "Task completed";
pub const TASK_REOPENED: &str = "Task marked as in progress";
pub const UNASSIGNED: &str = "Unassigned";

const LOAD_FAILED: &str = "Failed to load tasks";
const LOAD_ONE_FAILED: &str = "Failed to load task";
const CREATE_FAILED: &str = "Failed to create task";
const UPDATE_FAILED: &str = "Failed to update task";
const DELETE_FAILED: &str = "Failed to delete task";

/// Whose tasks to keep.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssignmentFilter {
    #[default]
    All,
    Me,
    Unassigned,
    User(String),
}

impl FromStr for AssignmentFilter {
    type Err = String;

    /// Anything other than `all`, `me` or `unassigned` is taken as a user id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" => Err("Assignment filter cannot be empty".to_string()),
            "all" => Ok(Self::All),
            "me" => Ok(Self::Me),
            "unassigned" => Ok(Self::Unassigned),
            _ => Ok(Self::User(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilters {
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: AssignmentFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSort {
    Title,
    Priority,
    DueDate,
    Status,
}

impl FromStr for TaskSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "title" => Ok(Self::Title),
            "priority" => Ok(Self::Priority),
            "duedate" | "due" => Ok(Self::DueDate),
            "status" => Ok(Self::Status),
            _ => Err(format!(
                "Invalid sort field: {s}. Valid values: title, priority, due-date, status"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskGrouping {
    Status,
    Priority,
    Assignee,
}

impl FromStr for TaskGrouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "status" => Ok(Self::Status),
            "priority" => Ok(Self::Priority),
            "assignee" | "assigned" => Ok(Self::Assignee),
            _ => Err(format!("Invalid grouping: {s}. Valid values: status, priority, assignee")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskGroup {
    pub key: String,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub mine: usize,
    pub unassigned: usize,
    pub high_priority: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskState {
    pub tasks: Vec<Task>,
    pub selected: Option<Task>,
    pub in_flight: usize,
    pub error: Option<String>,
    pub filters: TaskFilters,
    pub project_id: Option<String>,
}

impl Tracked for TaskState {
    fn in_flight_mut(&mut self) -> &mut usize {
        &mut self.in_flight
    }

    fn error_mut(&mut self) -> &mut Option<String> {
        &mut self.error
    }
}

impl TaskState {
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn filtered(&self, user_id: Option<&str>) -> Vec<Task> {
        let filters = &self.filters;
        self.tasks
            .iter()
            .filter(|t| match &filters.search {
                Some(term) => matches_search(
                    term,
                    [
                        Some(t.title.as_str()),
                        t.description.as_deref(),
                        t.assigned_to_name.as_deref(),
                    ],
                ),
                None => true,
            })
            .filter(|t| filters.status.is_none_or(|status| t.status == status))
            .filter(|t| filters.priority.is_none_or(|priority| t.priority == priority))
            .filter(|t| matches_assignment(t, &filters.assigned_to, user_id))
            .cloned()
            .collect()
    }

    pub fn with_status(&self, status: TaskStatus) -> Vec<Task> {
        self.select(|t| t.status == status)
    }

    pub fn mine(&self, user_id: Option<&str>) -> Vec<Task> {
        self.select(|t| user_id.is_some() && t.assigned_to_id.as_deref() == user_id)
    }

    pub fn unassigned(&self) -> Vec<Task> {
        self.select(|t| t.assigned_to_id.is_none())
    }

    pub fn stats(&self, user_id: Option<&str>) -> TaskStats {
        let count = |pred: &dyn Fn(&Task) -> bool| self.tasks.iter().filter(|t| pred(t)).count();
        TaskStats {
            total: self.tasks.len(),
            pending: count(&|t| t.status == TaskStatus::Pending),
            in_progress: count(&|t| t.status == TaskStatus::InProgress),
            completed: count(&|t| t.status == TaskStatus::Completed),
            mine: self.mine(user_id).len(),
            unassigned: count(&|t| t.assigned_to_id.is_none()),
            high_priority: count(&|t| t.priority == TaskPriority::High),
        }
    }

    fn select(&self, pred: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.tasks.iter().filter(|t| pred(t)).cloned().collect()
    }
}

fn matches_assignment(task: &Task, filter: &AssignmentFilter, user_id: Option<&str>) -> bool {
    let assignee = task.assigned_to_id.as_deref();
    match filter {
        AssignmentFilter::All => true,
        AssignmentFilter::Unassigned => assignee.is_none(),
        // Without a signed-in user there is no "me" to filter on.
        AssignmentFilter::Me => user_id.is_none() || assignee == user_id,
        AssignmentFilter::User(id) => assignee == Some(id.as_str()),
    }
}

/// Stable sort of `tasks`.
///
/// Priority and status order by rank, not by label. Undated tasks sort after
/// dated ones in both directions.
pub fn sort_tasks(tasks: &[Task], by: TaskSort, order: SortOrder) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| match by {
        TaskSort::Title => order.apply(compare_names(&a.title, &b.title)),
        TaskSort::Priority => order.apply(a.priority.rank().cmp(&b.priority.rank())),
        TaskSort::Status => order.apply(a.status.rank().cmp(&b.status.rank())),
        TaskSort::DueDate => compare_due(a, b, order),
    });
    sorted
}

fn compare_due(a: &Task, b: &Task, order: SortOrder) -> Ordering {
    let due = |t: &Task| t.due_date.as_deref().and_then(parse_timestamp);
    match (due(a), due(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => order.apply(x.cmp(&y)),
    }
}

/// Bucket `tasks` by `grouping`. Groups appear in first-seen order.
pub fn group_tasks(tasks: &[Task], grouping: TaskGrouping) -> Vec<TaskGroup> {
    let mut groups: Vec<TaskGroup> = Vec::new();
    for task in tasks {
        let key = match grouping {
            TaskGrouping::Status => task.status.as_str().to_string(),
            TaskGrouping::Priority => task.priority.as_str().to_string(),
            TaskGrouping::Assignee => task
                .assigned_to_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNASSIGNED.to_string()),
        };
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.tasks.push(task.clone()),
            None => groups.push(TaskGroup {
                key,
                tasks: vec![task.clone()],
            }),
        }
    }
    groups
}

struct Inner {
    tx: watch::Sender<TaskState>,
    api: Arc<dyn TaskApi>,
    session: SessionStore,
    notifications: NotificationCenter,
}

/// Owner of the loaded tasks of the current project.
#[derive(Clone)]
pub struct TaskStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("state", &*self.inner.tx.borrow())
            .finish_non_exhaustive()
    }
}

impl TaskStore {
    pub fn new(
        api: Arc<dyn TaskApi>,
        session: SessionStore,
        notifications: NotificationCenter,
    ) -> Self {
        let (tx, _rx) = watch::channel(TaskState::default());
        Self {
            inner: Arc::new(Inner {
                tx,
                api,
                session,
                notifications,
            }),
        }
    }

    pub fn state(&self) -> TaskState {
        self.inner.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskState> {
        self.inner.tx.subscribe()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.inner.tx.borrow().tasks.clone()
    }

    pub fn selected(&self) -> Option<Task> {
        self.inner.tx.borrow().selected.clone()
    }

    pub fn project_id(&self) -> Option<String> {
        self.inner.tx.borrow().project_id.clone()
    }

    pub fn loading(&self) -> bool {
        self.inner.tx.borrow().loading()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.tx.borrow().error.clone()
    }

    /// Load the tasks of `project_id`, making it the current project.
    pub async fn load(&self, project_id: &str) -> Result<(), ApiError> {
        let guard = LoadingGuard::start(&self.inner.tx);
        self.inner
            .tx
            .send_modify(|s| s.project_id = Some(project_id.to_string()));
        match self.inner.api.list(project_id).await {
            Ok(tasks) => {
                debug!(project_id, count = tasks.len(), "Tasks loaded");
                self.inner.tx.send_modify(|s| s.tasks = tasks);
                Ok(())
            }
            Err(err) => {
                guard.fail(&err, LOAD_FAILED);
                Err(err)
            }
        }
    }

    pub async fn load_one(&self, project_id: &str, task_id: &str) -> Result<Task, ApiError> {
        let guard = LoadingGuard::start(&self.inner.tx);
        match self.inner.api.get(project_id, task_id).await {
            Ok(task) => {
                self.inner.tx.send_modify(|s| {
                    replace_by_id(&mut s.tasks, &task);
                    s.selected = Some(task.clone());
                });
                Ok(task)
            }
            Err(err) => {
                guard.fail(&err, LOAD_ONE_FAILED);
                Err(err)
            }
        }
    }

    pub async fn create(&self, project_id: &str, data: &CreateTaskRequest) -> Result<Task, ApiError> {
        let guard = LoadingGuard::start(&self.inner.tx);
        match self.inner.api.create(project_id, data).await {
            Ok(task) => {
                debug!(id = %task.id, project_id, "Task created");
                self.inner.tx.send_modify(|s| s.tasks.push(task.clone()));
                self.inner.notifications.success(TASK_CREATED);
                Ok(task)
            }
            Err(err) => {
                guard.fail(&err, CREATE_FAILED);
                Err(err)
            }
        }
    }

    pub async fn update(
        &self,
        project_id: &str,
        task_id: &str,
        data: &UpdateTaskRequest,
    ) -> Result<Task, ApiError> {
        let guard = LoadingGuard::start(&self.inner.tx);
        match self.inner.api.update(project_id, task_id, data).await {
            Ok(task) => {
                self.commit_update(&task);
                self.inner.notifications.success(TASK_UPDATED);
                Ok(task)
            }
            Err(err) => {
                guard.fail(&err, UPDATE_FAILED);
                Err(err)
            }
        }
    }

    /// Delete a task. The selection is cleared only if it was this task.
    pub async fn delete(&self, project_id: &str, task_id: &str) -> Result<(), ApiError> {
        let guard = LoadingGuard::start(&self.inner.tx);
        match self.inner.api.delete(project_id, task_id).await {
            Ok(()) => {
                self.inner.tx.send_modify(|s| {
                    s.tasks.retain(|t| t.id != task_id);
                    if s.selected.as_ref().is_some_and(|sel| sel.id == task_id) {
                        s.selected = None;
                    }
                });
                self.inner.notifications.success(TASK_DELETED);
                Ok(())
            }
            Err(err) => {
                guard.fail(&err, DELETE_FAILED);
                Err(err)
            }
        }
    }

    /// Flip a task between Completed and InProgress, keeping its other fields.
    pub async fn toggle_completed(&self, task: &Task) -> Result<Task, ApiError> {
        let project_id = self
            .project_id()
            .unwrap_or_else(|| task.project_id.clone());
        let mut change = task.to_update();
        change.status = match task.status {
            TaskStatus::Completed => TaskStatus::InProgress,
            _ => TaskStatus::Completed,
        };

        let guard = LoadingGuard::start(&self.inner.tx);
        match self.inner.api.update(&project_id, &task.id, &change).await {
            Ok(updated) => {
                self.commit_update(&updated);
                let notice = match updated.status {
                    TaskStatus::Completed => TASK_COMPLETED,
                    _ => TASK_REOPENED,
                };
                self.inner.notifications.success(notice);
                Ok(updated)
            }
            Err(err) => {
                guard.fail(&err, UPDATE_FAILED);
                Err(err)
            }
        }
    }

    fn commit_update(&self, task: &Task) {
        self.inner.tx.send_modify(|s| {
            replace_by_id(&mut s.tasks, task);
            if s.selected.as_ref().is_some_and(|sel| sel.id == task.id) {
                s.selected = Some(task.clone());
            }
        });
    }

    pub fn set_filters(&self, filters: TaskFilters) {
        self.inner.tx.send_modify(|s| s.filters = filters);
    }

    pub fn clear_filters(&self) {
        self.set_filters(TaskFilters::default());
    }

    pub fn clear_selected(&self) {
        self.inner.tx.send_if_modified(|s| s.selected.take().is_some());
    }

    /// Drop the collection, selection, filters and current project.
    pub fn clear(&self) {
        self.inner.tx.send_modify(|s| {
            s.tasks.clear();
            s.selected = None;
            s.filters = TaskFilters::default();
            s.project_id = None;
        });
    }

    pub fn filtered(&self) -> Vec<Task> {
        self.inner.tx.borrow().filtered(self.user_id().as_deref())
    }

    pub fn pending(&self) -> Vec<Task> {
        self.inner.tx.borrow().with_status(TaskStatus::Pending)
    }

    pub fn in_progress(&self) -> Vec<Task> {
        self.inner.tx.borrow().with_status(TaskStatus::InProgress)
    }

    pub fn completed(&self) -> Vec<Task> {
        self.inner.tx.borrow().with_status(TaskStatus::Completed)
    }

    pub fn mine(&self) -> Vec<Task> {
        self.inner.tx.borrow().mine(self.user_id().as_deref())
    }

    pub fn unassigned(&self) -> Vec<Task> {
        self.inner.tx.borrow().unassigned()
    }

    pub fn stats(&self) -> TaskStats {
        self.inner.tx.borrow().stats(self.user_id().as_deref())
    }

    fn user_id(&self) -> Option<String> {
        self.inner.session.user_id()
    }
}

fn replace_by_id(tasks: &mut [Task], task: &Task) {
    if let Some(slot) = tasks.iter_mut().find(|t| t.id == task.id) {
        *slot = task.clone();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    pub fn task(id: &str, priority: TaskPriority, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            project_id: "p1".to_string(),
            title: format!("Task {id}"),
            description: None,
            priority,
            status,
            due_date: None,
            assigned_to_id: None,
            assigned_to_name: None,
            created_by_id: "u1".to_string(),
            created_by_name: None,
            created_date: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[derive(Default)]
    pub struct FakeTasks {
        pub tasks: Mutex<Vec<Task>>,
        pub failure: Mutex<Option<ApiError>>,
        pub updates: Mutex<Vec<(String, String, UpdateTaskRequest)>>,
    }

    impl FakeTasks {
        pub fn with(tasks: Vec<Task>) -> Arc<Self> {
            let fake = Self::default();
            *fake.tasks.lock().unwrap() = tasks;
            Arc::new(fake)
        }

        pub fn fail_next(&self, err: ApiError) {
            *self.failure.lock().unwrap() = Some(err);
        }

        fn check(&self) -> Result<(), ApiError> {
            match self.failure.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn not_found() -> ApiError {
            ApiError::Status {
                status: 404,
                message: None,
            }
        }
    }

    #[async_trait]
    impl TaskApi for FakeTasks {
        async fn list(&self, project_id: &str) -> Result<Vec<Task>, ApiError> {
            self.check()?;
            Ok(self
                .tasks
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.project_id == project_id)
                .cloned()
                .collect())
        }

        async fn get(&self, _project_id: &str, task_id: &str) -> Result<Task, ApiError> {
            self.check()?;
            self.tasks
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == task_id)
                .cloned()
                .ok_or_else(Self::not_found)
        }

        async fn create(&self, project_id: &str, data: &CreateTaskRequest) -> Result<Task, ApiError> {
            self.check()?;
            let mut tasks = self.tasks.lock().unwrap();
            let mut created = task(&format!("t{}", tasks.len() + 1), data.priority, data.status);
            created.project_id = project_id.to_string();
            created.title = data.title.clone();
            tasks.push(created.clone());
            Ok(created)
        }

        async fn update(
            &self,
            project_id: &str,
            task_id: &str,
            data: &UpdateTaskRequest,
        ) -> Result<Task, ApiError> {
            self.check()?;
            self.updates.lock().unwrap().push((
                project_id.to_string(),
                task_id.to_string(),
                data.clone(),
            ));
            let mut tasks = self.tasks.lock().unwrap();
            let existing = tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(Self::not_found)?;
            existing.title = data.title.clone();
            existing.description = data.description.clone();
            existing.priority = data.priority;
            existing.status = data.status;
            existing.due_date = data.due_date.clone();
            existing.assigned_to_id = data.assigned_to_id.clone();
            Ok(existing.clone())
        }

        async fn delete(&self, _project_id: &str, task_id: &str) -> Result<(), ApiError> {
            self.check()?;
            self.tasks.lock().unwrap().retain(|t| t.id != task_id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{FakeTasks, task};
    use super::*;
    use crate::session::test_support::{Harness, signed_in};
    use crate::models::TaskPriority::{High, Low, Medium};
    use crate::models::TaskStatus::{Completed, InProgress, Pending};

    fn store_with(tasks: Vec<Task>) -> (TaskStore, Arc<FakeTasks>, Harness) {
        let h = signed_in("u1", &["User"]);
        let fake = FakeTasks::with(tasks);
        let store = TaskStore::new(fake.clone(), h.store.clone(), h.notifications.clone());
        (store, fake, h)
    }

    fn assigned(mut t: Task, id: &str, name: &str) -> Task {
        t.assigned_to_id = Some(id.to_string());
        t.assigned_to_name = Some(name.to_string());
        t
    }

    fn due(mut t: Task, date: &str) -> Task {
        t.due_date = Some(date.to_string());
        t
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn sample() -> Vec<Task> {
        vec![
            assigned(task("t1", Low, Pending), "u1", "alice"),
            assigned(task("t2", High, InProgress), "u2", "bob"),
            task("t3", Medium, Completed),
            assigned(task("t4", High, Pending), "u1", "alice"),
        ]
    }

    #[tokio::test]
    async fn load_sets_current_project() {
        let (store, _fake, _h) = store_with(sample());
        store.load("p1").await.unwrap();
        assert_eq!(store.project_id().as_deref(), Some("p1"));
        assert_eq!(store.tasks().len(), 4);
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn deleting_selected_task_clears_selection() {
        let (store, _fake, _h) = store_with(sample());
        store.load("p1").await.unwrap();
        store.load_one("p1", "t2").await.unwrap();

        store.delete("p1", "t2").await.unwrap();
        assert!(store.selected().is_none());
        assert_eq!(ids(&store.tasks()), ["t1", "t3", "t4"]);
    }

    #[tokio::test]
    async fn deleting_other_task_keeps_selection() {
        let (store, _fake, _h) = store_with(sample());
        store.load("p1").await.unwrap();
        store.load_one("p1", "t2").await.unwrap();

        store.delete("p1", "t3").await.unwrap();
        assert_eq!(store.selected().unwrap().id, "t2");
    }

    #[tokio::test]
    async fn failed_delete_keeps_task_and_clears_loading() {
        let (store, fake, _h) = store_with(sample());
        store.load("p1").await.unwrap();
        fake.fail_next(ApiError::Status {
            status: 403,
            message: None,
        });
        assert!(store.delete("p1", "t1").await.is_err());
        assert_eq!(store.tasks().len(), 4);
        assert_eq!(store.error().as_deref(), Some(DELETE_FAILED));
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn create_appends_and_notifies() {
        let (store, _fake, h) = store_with(sample());
        store.load("p1").await.unwrap();
        let created = store
            .create(
                "p1",
                &CreateTaskRequest {
                    title: "Ship".into(),
                    description: None,
                    priority: High,
                    status: Pending,
                    due_date: None,
                    assigned_to_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(store.tasks().last().unwrap().id, created.id);
        assert_eq!(h.notifications.active().last().unwrap().message, TASK_CREATED);
    }

    #[tokio::test]
    async fn toggle_completed_flips_status_and_keeps_fields() {
        let (store, fake, h) = store_with(sample());
        store.load("p1").await.unwrap();
        let original = store.tasks()[0].clone();

        let done = store.toggle_completed(&original).await.unwrap();
        assert_eq!(done.status, Completed);
        assert_eq!(h.notifications.active().last().unwrap().message, TASK_COMPLETED);

        let reopened = store.toggle_completed(&done).await.unwrap();
        assert_eq!(reopened.status, InProgress);
        assert_eq!(h.notifications.active().last().unwrap().message, TASK_REOPENED);

        let updates = fake.updates.lock().unwrap();
        let (project_id, task_id, sent) = &updates[0];
        assert_eq!((project_id.as_str(), task_id.as_str()), ("p1", "t1"));
        assert_eq!(sent.title, original.title);
        assert_eq!(sent.assigned_to_id, original.assigned_to_id);
        assert_eq!(sent.priority, original.priority);
    }

    #[tokio::test]
    async fn views_follow_collection_and_filters() {
        let (store, _fake, _h) = store_with(sample());
        store.load("p1").await.unwrap();

        assert_eq!(ids(&store.pending()), ["t1", "t4"]);
        assert_eq!(ids(&store.in_progress()), ["t2"]);
        assert_eq!(ids(&store.completed()), ["t3"]);
        assert_eq!(ids(&store.mine()), ["t1", "t4"]);
        assert_eq!(ids(&store.unassigned()), ["t3"]);

        store.set_filters(TaskFilters {
            priority: Some(High),
            assigned_to: AssignmentFilter::Me,
            ..Default::default()
        });
        assert_eq!(ids(&store.filtered()), ["t4"]);

        store.set_filters(TaskFilters {
            search: Some("BOB".into()),
            ..Default::default()
        });
        assert_eq!(ids(&store.filtered()), ["t2"]);

        store.set_filters(TaskFilters {
            assigned_to: "u2".parse().unwrap(),
            ..Default::default()
        });
        assert_eq!(ids(&store.filtered()), ["t2"]);
    }

    #[tokio::test]
    async fn stats_count_everything() {
        let (store, _fake, _h) = store_with(sample());
        store.load("p1").await.unwrap();
        assert_eq!(
            store.stats(),
            TaskStats {
                total: 4,
                pending: 2,
                in_progress: 1,
                completed: 1,
                mine: 2,
                unassigned: 1,
                high_priority: 2,
            }
        );
    }

    #[tokio::test]
    async fn clear_resets_project_and_filters() {
        let (store, _fake, _h) = store_with(sample());
        store.load("p1").await.unwrap();
        store.set_filters(TaskFilters {
            status: Some(Pending),
            ..Default::default()
        });
        store.clear();
        assert_eq!(store.state(), TaskState::default());
    }

    #[test]
    fn priority_sort_uses_rank_and_is_stable() {
        let input = vec![
            task("a", Low, Pending),
            task("b", High, Pending),
            task("c", Medium, Pending),
            task("d", High, Pending),
            task("e", Low, Pending),
        ];
        let desc = sort_tasks(&input, TaskSort::Priority, SortOrder::Desc);
        assert_eq!(ids(&desc), ["b", "d", "c", "a", "e"]);
        let asc = sort_tasks(&input, TaskSort::Priority, SortOrder::Asc);
        assert_eq!(ids(&asc), ["a", "e", "c", "b", "d"]);
    }

    #[test]
    fn status_sort_uses_rank() {
        let input = vec![
            task("a", Low, Completed),
            task("b", Low, Pending),
            task("c", Low, InProgress),
        ];
        assert_eq!(
            ids(&sort_tasks(&input, TaskSort::Status, SortOrder::Asc)),
            ["b", "c", "a"]
        );
    }

    #[test]
    fn undated_tasks_sort_last_in_both_directions() {
        let input = vec![
            task("none", Low, Pending),
            due(task("late", Low, Pending), "2024-06-01"),
            due(task("early", Low, Pending), "2024-01-01"),
        ];
        assert_eq!(
            ids(&sort_tasks(&input, TaskSort::DueDate, SortOrder::Asc)),
            ["early", "late", "none"]
        );
        assert_eq!(
            ids(&sort_tasks(&input, TaskSort::DueDate, SortOrder::Desc)),
            ["late", "early", "none"]
        );
    }

    #[test]
    fn grouping_keeps_first_seen_order() {
        let groups = group_tasks(&sample(), TaskGrouping::Assignee);
        let keys: Vec<_> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, ["alice", "bob", UNASSIGNED]);
        assert_eq!(ids(&groups[0].tasks), ["t1", "t4"]);

        let by_priority = group_tasks(&sample(), TaskGrouping::Priority);
        let keys: Vec<_> = by_priority.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, ["Low", "High", "Medium"]);
    }

    #[test]
    fn assignment_filter_parses_user_ids() {
        assert_eq!("ME".parse::<AssignmentFilter>().unwrap(), AssignmentFilter::Me);
        assert_eq!(
            "u42".parse::<AssignmentFilter>().unwrap(),
            AssignmentFilter::User("u42".into())
        );
    }
}
