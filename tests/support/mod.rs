//! An in-process stand-in for the TaskDeck backend.
//!
//! Serves the handful of endpoints the flow tests touch on an ephemeral port
//! and records the `Authorization` header of every request it sees.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const NAME_IDENTIFIER: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
pub const NAME: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";
pub const ROLE: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "secret";
pub const USER_ID: &str = "u1";

/// An unsigned token for `user_id` expiring `ttl_secs` from now.
pub fn token_for(user_id: &str, username: &str, roles: &[&str], ttl_secs: i64) -> String {
    let mut payload = serde_json::Map::new();
    payload.insert(NAME_IDENTIFIER.into(), json!(user_id));
    payload.insert(NAME.into(), json!(username));
    payload.insert(ROLE.into(), json!(roles));
    payload.insert("exp".into(), json!(chrono::Utc::now().timestamp() + ttl_secs));
    let payload = Value::Object(payload);
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}

pub fn project_json(id: &str, name: &str, owner_id: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": "InProgress",
        "creationDate": "2024-01-01T00:00:00Z",
        "ownerId": owner_id,
        "ownerName": "alice",
        "membersCount": 1,
    })
}

#[derive(Default)]
pub struct BackendState {
    pub projects: Vec<Value>,
    /// (path, Authorization header) per request, in arrival order
    pub requests: Vec<(String, Option<String>)>,
    /// Reject every bearer token with 401
    pub revoke_tokens: bool,
}

#[derive(Clone)]
pub struct FakeBackend {
    pub url: String,
    pub state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    /// Bind to an ephemeral port and serve until the runtime shuts down.
    pub async fn start(projects: Vec<Value>) -> Self {
        let state = Arc::new(Mutex::new(BackendState {
            projects,
            ..Default::default()
        }));

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/projects", get(list_projects).post(create_project))
            .route("/api/projects/{id}", get(get_project))
            .route("/api/users/search", get(search_users))
            .route("/api/users/me", get(broken_profile))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn revoke_tokens(&self) {
        self.state.lock().unwrap().revoke_tokens = true;
    }

    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// The Authorization header sent with the last request to `path`.
    pub fn last_auth_for(&self, path: &str) -> Option<Option<String>> {
        self.requests()
            .into_iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, auth)| auth)
    }
}

type Shared = Arc<Mutex<BackendState>>;

fn record(state: &Shared, path: &str, headers: &HeaderMap) {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.lock().unwrap().requests.push((path.to_string(), auth));
}

/// 401 unless a bearer token is present and tokens are not revoked.
fn authorize(state: &Shared, headers: &HeaderMap) -> Result<(), Response> {
    let has_bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "));
    if has_bearer && !state.lock().unwrap().revoke_tokens {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"}))).into_response())
    }
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record(&state, "/api/auth/login", &headers);
    if body["username"] == USERNAME && body["password"] == PASSWORD {
        Json(json!({
            "status": "Success",
            "token": token_for(USER_ID, USERNAME, &["User"], 3600),
            "userId": USER_ID,
            "username": USERNAME,
            "roles": ["User"],
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"Message": "Invalid username or password"})),
        )
            .into_response()
    }
}

async fn register(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "/api/auth/register", &headers);
    if body["username"] == USERNAME {
        (
            StatusCode::CONFLICT,
            Json(json!({"message": "Username already exists"})),
        )
            .into_response()
    } else {
        Json(json!({"status": "Success"})).into_response()
    }
}

async fn list_projects(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "/api/projects", &headers);
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    let projects = state.lock().unwrap().projects.clone();
    Json(projects).into_response()
}

async fn create_project(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "/api/projects", &headers);
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    let mut guard = state.lock().unwrap();
    let id = format!("p{}", guard.projects.len() + 1);
    let mut project = project_json(&id, body["name"].as_str().unwrap_or_default(), USER_ID);
    project["status"] = body["status"].clone();
    guard.projects.push(project.clone());
    (StatusCode::CREATED, Json(project)).into_response()
}

async fn get_project(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    record(&state, &format!("/api/projects/{id}"), &headers);
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    let found = state
        .lock()
        .unwrap()
        .projects
        .iter()
        .find(|p| p["id"] == id.as_str())
        .cloned();
    match found {
        Some(project) => Json(project).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn search_users(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "/api/users/search", &headers);
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }
    let term = query.get("q").cloned().unwrap_or_default();
    let users: Vec<Value> = [("u1", "alice"), ("u2", "bob")]
        .into_iter()
        .filter(|(_, name)| name.contains(term.as_str()))
        .map(|(id, name)| json!({"userId": id, "userName": name, "email": format!("{name}@example.com")}))
        .collect();
    Json(users).into_response()
}

/// Answers 200 with a body that is not a profile.
async fn broken_profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "/api/users/me", &headers);
    (StatusCode::OK, "<html>maintenance</html>").into_response()
}
