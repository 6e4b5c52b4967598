//! Navigation surfaces and the navigator seam.

use reqwest::Url;
use std::sync::Mutex;
use tracing::debug;

pub const LOGIN: &str = "/auth/login";
pub const REGISTER: &str = "/auth/register";
pub const DASHBOARD: &str = "/dashboard";
pub const PROJECTS: &str = "/projects";
pub const PROJECT_CREATE: &str = "/projects/create";
pub const USERS: &str = "/users";
pub const PROFILE: &str = "/users/me";
pub const USER_SEARCH: &str = "/users/search";
pub const NOT_FOUND: &str = "/404";
pub const FORBIDDEN: &str = "/403";

pub const RETURN_URL_PARAM: &str = "returnUrl";

pub fn project_detail(id: &str) -> String {
    format!("{PROJECTS}/{id}")
}

pub fn project_edit(id: &str) -> String {
    format!("{PROJECTS}/{id}/edit")
}

pub fn user_detail(id: &str) -> String {
    format!("{USERS}/{id}")
}

// Only used to borrow Url's query encoding; never leaves this module.
const LOCAL_ORIGIN: &str = "http://taskdeck.local";

/// Login route carrying `return_url` as an encoded query parameter.
pub fn login_with_return(return_url: &str) -> String {
    let Ok(mut url) = Url::parse(LOCAL_ORIGIN).and_then(|base| base.join(LOGIN)) else {
        return LOGIN.to_string();
    };
    url.query_pairs_mut()
        .append_pair(RETURN_URL_PARAM, return_url);
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

/// The `returnUrl` carried by `location`, if any.
pub fn return_url(location: &str) -> Option<String> {
    let url = Url::parse(LOCAL_ORIGIN).ok()?.join(location).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == RETURN_URL_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Moves the user to another surface.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator that records every request, in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    /// The most recent navigation target.
    pub fn current(&self) -> Option<String> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        debug!(path, "Navigating");
        if let Ok(mut history) = self.history.lock() {
            history.push(path.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_routes() {
        assert_eq!(project_detail("p1"), "/projects/p1");
        assert_eq!(project_edit("p1"), "/projects/p1/edit");
        assert_eq!(user_detail("u1"), "/users/u1");
    }

    #[test]
    fn login_with_return_encodes_url() {
        let route = login_with_return("/projects/p1?tab=tasks");
        assert!(route.starts_with("/auth/login?returnUrl="));
        assert!(!route.contains("?tab"));
        assert_eq!(return_url(&route).as_deref(), Some("/projects/p1?tab=tasks"));
    }

    #[test]
    fn return_url_absent() {
        assert_eq!(return_url(LOGIN), None);
        assert_eq!(return_url("/auth/login?returnUrl="), None);
    }

    #[test]
    fn recording_navigator_keeps_history() {
        let nav = RecordingNavigator::new();
        assert_eq!(nav.current(), None);
        nav.navigate(DASHBOARD);
        nav.navigate(LOGIN);
        assert_eq!(nav.history(), vec![DASHBOARD, LOGIN]);
        assert_eq!(nav.current().as_deref(), Some(LOGIN));
    }
}
