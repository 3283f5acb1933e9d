//! Service Container - Centralized service access.
//!
//! Wires repositories into services once at startup so handlers only ever
//! see service traits.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{UserManager, UserService};
use crate::config::Config;
use crate::infra::UserStore;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Build every service on top of one database connection pool
    pub fn from_connection(db: DatabaseConnection, config: &Config) -> Self {
        let user_repo = Arc::new(UserStore::new(db, config.timezone));
        let user_service = Arc::new(UserManager::new(user_repo));

        Self { user_service }
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
