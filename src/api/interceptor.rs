//! Failure classification for the HTTP pipeline.
//!
//! Maps a failed call to the single user-facing message it produces and to
//! whether the session must end. The client applies the outcome once per
//! failed call and then hands the original error back to the caller.

/// What the pipeline does with one failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    /// The backend rejected a live session
    pub end_session: bool,
}

pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
pub const LOGIN_REQUIRED: &str = "You must log in to access this resource.";
pub const FORBIDDEN: &str = "You do not have permission to perform this action.";
pub const NOT_FOUND: &str = "The requested resource was not found.";
pub const CONFLICT: &str = "A resource with that data already exists.";
pub const INVALID_DATA: &str = "Invalid data. Check the information you sent.";
pub const SERVER_ERROR: &str = "Server error. Please try again later.";
pub const UNREACHABLE: &str = "Could not connect to the server. Check your internet connection.";
pub const UNEXPECTED_RESPONSE: &str = "The server sent a response that could not be read.";

/// Default message for a status, used when nothing more specific applies.
pub fn default_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request. Check the data you sent.",
        401 => "You are not authenticated. Please log in.",
        403 => FORBIDDEN,
        404 => "Resource not found.",
        409 => "Conflict with the current state of the resource.",
        500 => SERVER_ERROR,
        _ => "Something went wrong. Please try again.",
    }
}

/// Classify a failure. `status` is 0 when no response arrived.
pub fn classify(status: u16, backend_message: Option<&str>, authenticated: bool) -> Outcome {
    let backend = backend_message.filter(|m| !m.trim().is_empty());
    let (message, end_session) = match status {
        401 if authenticated => (SESSION_EXPIRED.to_string(), true),
        401 => (LOGIN_REQUIRED.to_string(), false),
        403 => (FORBIDDEN.to_string(), false),
        404 => (NOT_FOUND.to_string(), false),
        409 => (backend.unwrap_or(CONFLICT).to_string(), false),
        400 => (backend.unwrap_or(INVALID_DATA).to_string(), false),
        s if s >= 500 => (SERVER_ERROR.to_string(), false),
        0 => (UNREACHABLE.to_string(), false),
        s => (backend.unwrap_or(default_message(s)).to_string(), false),
    };
    Outcome {
        message,
        end_session,
    }
}

/// Pull the human-readable message out of an error body.
///
/// The backend uses either `message` or `Message`; empty strings count as absent.
pub fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "Message"]
        .iter()
        .filter_map(|key| value.get(key))
        .filter_map(serde_json::Value::as_str)
        .find(|m| !m.trim().is_empty())
        .map(str::to_string)
}
