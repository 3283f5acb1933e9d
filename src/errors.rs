//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion into the standard envelope.

use std::collections::BTreeMap;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::types::ApiResponse;

/// Field name to message map returned with validation failures
pub type FieldErrors = BTreeMap<String, String>;

/// A transactional step that touched zero rows or found nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceFailure {
    CreateUser,
    CreateEmail,
    ReadUser,
    UpdateUser,
    DeleteUser,
}

impl PersistenceFailure {
    pub fn code(&self) -> &'static str {
        match self {
            PersistenceFailure::CreateUser => "FAILED_TO_CREATE_USER",
            PersistenceFailure::CreateEmail => "FAILED_TO_CREATE_EMAIL",
            PersistenceFailure::ReadUser => "FAILED_TO_READ_USER_DATA",
            PersistenceFailure::UpdateUser => "FAILED_TO_UPDATE_USER_DATA",
            PersistenceFailure::DeleteUser => "FAILED_TO_DELETE_USER_DATA",
        }
    }
}

impl fmt::Display for PersistenceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Invalid parameter {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    // Business rules
    #[error("Duplicate email in request")]
    DuplicateEmail,

    // Storage
    #[error("{0}")]
    Persistence(PersistenceFailure),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Cache error: {0}")]
    Cache(String),

    // Routing
    #[error("Route not found")]
    RouteNotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code, used in logs
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::InvalidParameter { .. } => "INVALID_PARAMETER",
            AppError::DuplicateEmail => "DUPLICATE_EMAIL",
            AppError::Persistence(failure) => failure.code(),
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Cache(_) => "CACHE_ERROR",
            AppError::RouteNotFound => "NOT_FOUND",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::DuplicateEmail
            | AppError::Persistence(_)
            | AppError::Database(_)
            | AppError::Cache(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing payload; internal failures expose nothing
    fn data(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Validation(fields) => serde_json::to_value(fields).ok(),
            AppError::BadRequest(msg) => Some(serde_json::Value::String(msg.clone())),
            AppError::InvalidParameter { field, reason } => {
                let mut fields = FieldErrors::new();
                fields.insert(field.clone(), reason.clone());
                serde_json::to_value(fields).ok()
            }
            _ => None,
        }
    }

    pub fn validation(fields: FieldErrors) -> Self {
        AppError::Validation(fields)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn invalid_parameter(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

impl From<PersistenceFailure> for AppError {
    fn from(failure: PersistenceFailure) -> Self {
        AppError::Persistence(failure)
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Cache(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        }

        ApiResponse::new(status, self.data()).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;
