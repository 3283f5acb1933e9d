//! CRUD API Starter - User and email REST API
//!
//! A layered Axum + SeaORM service exposing create, paginated read, update
//! and delete for users and the emails they own.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: User aggregate and layer-crossing data
//! - **services**: Use cases (duplicate checks, parameter coercion)
//! - **infra**: Database, migrations, repositories, unit of work, cache
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, response envelope)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Insert demo data
//! cargo run -- seed
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Email, User};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
