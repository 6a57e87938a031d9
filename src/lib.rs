//! Gearhouse Team Equipment Checkout
//!
//! A Rust implementation of the Gearhouse equipment tracking server,
//! providing a REST JSON API for managing the equipment catalog, per-session
//! reservation carts, borrow/return transactions, and borrow manifests.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod manifest;
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
