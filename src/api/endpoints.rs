//! Backend endpoint paths, relative to the configured base URL.

pub const LOGIN: &str = "/api/auth/login";
pub const REGISTER: &str = "/api/auth/register";

pub const PROJECTS: &str = "/api/projects";

pub const USER_SEARCH: &str = "/api/users/search";
pub const ME: &str = "/api/users/me";
pub const CHANGE_PASSWORD: &str = "/api/users/me/change-password";
pub const PROFILE_IMAGE: &str = "/api/users/me/profile-image";
pub const USERS: &str = "/api/users";

pub fn project(id: &str) -> String {
    format!("{PROJECTS}/{id}")
}

pub fn tasks(project_id: &str) -> String {
    format!("{PROJECTS}/{project_id}/tasks")
}

pub fn task(project_id: &str, task_id: &str) -> String {
    format!("{PROJECTS}/{project_id}/tasks/{task_id}")
}

pub fn members(project_id: &str) -> String {
    format!("{PROJECTS}/{project_id}/members")
}

pub fn member(project_id: &str, user_id: &str) -> String {
    format!("{PROJECTS}/{project_id}/members/{user_id}")
}

pub fn leave(project_id: &str) -> String {
    format!("{PROJECTS}/{project_id}/members/leave")
}

pub fn user(id: &str) -> String {
    format!("{USERS}/{id}")
}

pub fn user_roles(id: &str) -> String {
    format!("{USERS}/{id}/roles")
}

/// Requests to these paths never carry a bearer token.
pub fn is_auth_endpoint(path: &str) -> bool {
    path.contains(LOGIN) || path.contains(REGISTER)
}
