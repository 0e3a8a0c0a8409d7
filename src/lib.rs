pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use app::{create_app, spawn_blocklist_sweeper};
pub use config::AppConfig;
pub use state::AppState;
