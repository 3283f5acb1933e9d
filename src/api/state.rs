//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{ServiceContainer, Services, UserService};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Database connection
    pub database: Arc<Database>,
    /// Redis cache, present only when `USE_CACHE` is enabled
    pub cache: Option<Arc<Cache>>,
    /// Reported by the health endpoint
    pub app_name: String,
}

impl AppState {
    /// Build state with services wired through the [`Services`] container.
    pub fn from_config(database: Arc<Database>, cache: Option<Arc<Cache>>, config: &Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);

        Self {
            user_service: container.users(),
            database,
            cache,
            app_name: config.app_name.clone(),
        }
    }

    /// Create state with manually injected services.
    pub fn new(
        user_service: Arc<dyn UserService>,
        database: Arc<Database>,
        cache: Option<Arc<Cache>>,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            user_service,
            database,
            cache,
            app_name: app_name.into(),
        }
    }
}
