//! The HTTP pipeline every resource client goes through.
//!
//! Each call is wrapped, in order, by:
//! 1. activity tracking (the counter is released when the call settles),
//! 2. bearer-token attachment (skipped for the auth endpoints),
//! 3. failure classification: one notification per failed call, the session
//!    ended on a 401 against a live session, then the error returned as-is.

use reqwest::Method;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::endpoints;
use super::interceptor::{self, Outcome, UNEXPECTED_RESPONSE};
use crate::activity::ActivityCounter;
use crate::errors::ApiError;
use crate::notify::NotificationCenter;
use crate::session::SessionStore;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    activity: ActivityCounter,
    notifications: NotificationCenter,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: SessionStore,
        activity: ActivityCounter,
        notifications: NotificationCenter,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("taskdeck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            activity,
            notifications,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.send(Method::GET, path, &[], None::<&()>).await?;
        self.decode(&body)
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let body = self.send(Method::GET, path, query, None::<&()>).await?;
        self.decode(&body)
    }

    pub async fn post<B, T>(&self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(Method::POST, path, &[], Some(payload)).await?;
        self.decode(&body)
    }

    pub async fn put<B, T>(&self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(Method::PUT, path, &[], Some(payload)).await?;
        self.decode(&body)
    }

    /// POST whose response body is ignored.
    pub async fn post_unit<B>(&self, path: &str, payload: &B) -> Result<(), ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.send(Method::POST, path, &[], Some(payload)).await.map(drop)
    }

    /// PUT whose response body is ignored.
    pub async fn put_unit<B>(&self, path: &str, payload: &B) -> Result<(), ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.send(Method::PUT, path, &[], Some(payload)).await.map(drop)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, &[], None::<&()>).await.map(drop)
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        payload: Option<&B>,
    ) -> Result<String, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let _activity = self.activity.track();
        match self.dispatch(method, path, query, payload).await {
            Ok(body) => Ok(body),
            Err(err) => Err(self.report(err)),
        }
    }

    async fn dispatch<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        payload: Option<&B>,
    ) -> Result<String, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Sending request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        if !endpoints::is_auth_endpoint(path)
            && let Some(token) = self.session.token()
        {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(%method, %url, status = status.as_u16(), "Response received");

        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                message: interceptor::extract_message(&body),
            })
        }
    }

    fn decode<T: DeserializeOwned>(&self, body: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|e| self.report(ApiError::Decode(e.to_string())))
    }

    /// Apply the failure outcome once, then hand the error back.
    fn report(&self, err: ApiError) -> ApiError {
        // A committed session whose token lapsed mid-process is no longer
        // "authenticated" but must still be torn down on a 401.
        let committed = self.session.session().is_some();
        let outcome = match &err {
            ApiError::Decode(_) => Outcome {
                message: UNEXPECTED_RESPONSE.to_string(),
                end_session: false,
            },
            _ => interceptor::classify(
                err.status(),
                err.backend_message(),
                self.session.is_authenticated(),
            ),
        };
        warn!(status = err.status(), error = %err, "Request failed");
        if outcome.end_session || (err.status() == 401 && committed) {
            self.session.end_session();
        }
        self.notifications.error(outcome.message);
        err
    }
}
