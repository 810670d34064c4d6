pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use config::AppConfig;
use services::providers::ImageProvider;
use std::sync::Arc;

/// Shared application state for the HTTP adapter.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub provider: Arc<dyn ImageProvider>,
}

impl AppState {
    pub fn new(config: AppConfig, provider: Arc<dyn ImageProvider>) -> Self {
        Self { config, provider }
    }
}
