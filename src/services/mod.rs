//! Application services layer - Use cases and business logic.
//!
//! Services depend on repository traits, never on concrete stores.

pub mod container;
mod user_service;

pub use container::{ServiceContainer, Services};
pub use user_service::{UserManager, UserService};
