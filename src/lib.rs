//! Rescate Password Recovery Service
//!
//! A small REST service that issues, verifies, and retires short-lived
//! numeric reset codes for password recovery, delivering them by email with
//! a simulated fallback and delegating the final password update to an
//! external backend.

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
}
