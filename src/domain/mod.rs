//! Domain layer - Core business entities
//!
//! Contains the user aggregate (a user and the emails it owns) and the
//! data carried between the HTTP, service and repository layers.

pub mod user;

pub use user::{
    CreateUser, CreateUserData, Email, PaginatorResponse, ReadUserData, ReadUserRequest,
    UpdateUser, UpdateUserData, User,
};
