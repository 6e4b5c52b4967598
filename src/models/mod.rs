//! Wire types exchanged with the backend.
//!
//! Field names follow the backend's camelCase JSON. Timestamps are kept as
//! the strings the backend sent; [`parse_timestamp`] reads them when a view
//! needs to order by date.

pub mod auth;
pub mod member;
pub mod project;
pub mod task;
pub mod user;

pub use auth::{AuthResponse, CurrentUser, LoginOptions, LoginRequest, RegisterRequest};
pub use member::{AddMemberRequest, ProjectMember, ProjectRole, UpdateMemberRoleRequest};
pub use project::{CreateProjectRequest, Project, ProjectStatus, UpdateProjectRequest};
pub use task::{CreateTaskRequest, Task, TaskPriority, TaskStatus, UpdateTaskRequest};
pub use user::{
    ChangePasswordRequest, ManageRolesRequest, UpdateProfileRequest, UserDto, UserProfile,
    UserSearchResult,
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a backend timestamp.
///
/// Accepts RFC 3339, a zone-less date-time (read as UTC, which is what the
/// backend emits), or a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Sort direction for list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("Invalid sort order '{s}'. Valid values: asc, desc")),
        }
    }
}

/// Case-insensitive substring match against any of `fields`.
pub(crate) fn matches_search<'a>(
    term: &str,
    fields: impl IntoIterator<Item = Option<&'a str>>,
) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
}
