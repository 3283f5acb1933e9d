//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and seed data
//! - SeaORM entities and the user repository
//! - Unit of Work for transaction management
//! - Optional Redis cache

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{UserRepository, UserStore};
pub use unit_of_work::{Persistence, TransactionContext, TxUserRepository};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
