//! Bookshelf catalog server
//!
//! Publisher, author and book pages with paginated lists, form validation
//! and bearer-token protected edits.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
