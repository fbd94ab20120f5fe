//! Unilib - University Library Management Server
//!
//! A Rust REST API server for a university library: catalog browsing,
//! circulation (loans, reservations, fines), an institutional document
//! repository, a blog, events and basic analytics.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub pool: sqlx::PgPool,
}
