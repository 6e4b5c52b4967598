//! Backend access.
//!
//! [`ApiClient`] is the shared HTTP pipeline. Each resource has a trait that
//! containers depend on and a thin client implementing it over the pipeline.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod interceptor;
pub mod members;
pub mod projects;
pub mod tasks;
pub mod users;

pub use auth::{AuthApi, AuthClient};
pub use client::ApiClient;
pub use members::{MemberApi, MemberClient};
pub use projects::{ProjectApi, ProjectClient};
pub use tasks::{TaskApi, TaskClient};
pub use users::{UserApi, UserClient};
