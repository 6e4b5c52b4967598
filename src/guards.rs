//! Route guards and role-gated rendering.
//!
//! Guards are pure decisions over the current session. They never navigate
//! themselves; the caller acts on the returned [`GuardOutcome`].

use crate::notify::NotificationCenter;
use crate::routes;
use crate::session::SessionStore;

pub const PERMISSION_DENIED: &str = "You do not have permission to access this page.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(String),
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allow)
    }
}

/// Signed-in users pass; everyone else is sent to login with a way back.
pub fn auth_guard(session: &SessionStore, requested_url: &str) -> GuardOutcome {
    if session.is_authenticated() {
        GuardOutcome::Allow
    } else {
        GuardOutcome::Redirect(routes::login_with_return(requested_url))
    }
}

/// Login and register are only for signed-out users.
pub fn guest_guard(session: &SessionStore) -> GuardOutcome {
    if session.is_authenticated() {
        GuardOutcome::Redirect(routes::DASHBOARD.to_string())
    } else {
        GuardOutcome::Allow
    }
}

/// Allow when `required` is empty or shares a role with the session.
///
/// A rejection posts an error notification and redirects to the dashboard.
pub fn role_guard<S: AsRef<str>>(
    session: &SessionStore,
    notifications: &NotificationCenter,
    required: &[S],
) -> GuardOutcome {
    if required.is_empty() || session.has_any_role(required) {
        return GuardOutcome::Allow;
    }
    notifications.error(PERMISSION_DENIED);
    GuardOutcome::Redirect(routes::DASHBOARD.to_string())
}

/// Whether a role-gated element is shown. Re-evaluate on every session change.
pub fn should_render<R, C>(required: &[R], current: &[C]) -> bool
where
    R: AsRef<str>,
    C: AsRef<str>,
{
    required.is_empty()
        || required
            .iter()
            .any(|want| current.iter().any(|held| held.as_ref() == want.as_ref()))
}
