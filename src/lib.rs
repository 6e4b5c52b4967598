pub mod activity;
pub mod api;
pub mod app;
pub mod config;
pub mod errors;
pub mod guards;
pub mod logging;
pub mod models;
pub mod notify;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
pub mod token;
pub mod ui;

pub use app::App;
