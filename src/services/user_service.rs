//! User service - Handles user-related business logic.
//!
//! Enforces "no duplicate emails per request", coerces raw list parameters
//! into typed ones and delegates persistence to the repository.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CreateUser, PaginatorResponse, ReadUserData, ReadUserRequest, UpdateUser, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user with its emails
    async fn create(&self, input: CreateUser) -> AppResult<User>;

    /// List users from raw request parameters
    async fn read(&self, input: ReadUserRequest) -> AppResult<PaginatorResponse>;

    /// Update name and/or emails of a user
    async fn update(&self, input: UpdateUser) -> AppResult<User>;

    /// Delete a user and its emails
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService backed by a repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create(&self, input: CreateUser) -> AppResult<User> {
        ensure_unique_emails(&input.emails).map_err(log_step("create_user"))?;

        self.repo
            .create(input.into())
            .await
            .map_err(log_step("create_user"))
    }

    async fn read(&self, input: ReadUserRequest) -> AppResult<PaginatorResponse> {
        let data = parse_read_request(input).map_err(log_step("read_user"))?;

        self.repo.read(data).await.map_err(log_step("read_user"))
    }

    async fn update(&self, input: UpdateUser) -> AppResult<User> {
        if let Some(emails) = input.emails.as_deref() {
            ensure_unique_emails(emails).map_err(log_step("update_user"))?;
        }

        self.repo
            .update(input.into())
            .await
            .map_err(log_step("update_user"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await.map_err(log_step("delete_user"))
    }
}

/// Pairwise, case-sensitive duplicate check.
fn ensure_unique_emails(emails: &[String]) -> AppResult<()> {
    for (i, a) in emails.iter().enumerate() {
        if emails[i + 1..].iter().any(|b| a == b) {
            return Err(AppError::DuplicateEmail);
        }
    }
    Ok(())
}

fn parse_read_request(input: ReadUserRequest) -> AppResult<ReadUserData> {
    Ok(ReadUserData {
        page: parse_unsigned("page", &input.page)?,
        limit: parse_unsigned("limit", &input.limit)?,
        disable_calculate_total: parse_flag("disableCalculateTotal", &input.disable_calculate_total)?,
        id: parse_id("id", &input.id)?,
        order_by: input.order_by,
        sort_by: input.sort_by,
        search: input.search,
    })
}

fn parse_unsigned(field: &str, value: &str) -> AppResult<u64> {
    if value.is_empty() {
        return Ok(0);
    }
    // `u64::from_str` also takes a leading `+`
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::invalid_parameter(field, "must contain digits only"));
    }
    value
        .parse()
        .map_err(|_| AppError::invalid_parameter(field, "must contain digits only"))
}

fn parse_flag(field: &str, value: &str) -> AppResult<bool> {
    if value.is_empty() {
        return Ok(false);
    }
    value
        .parse()
        .map_err(|_| AppError::invalid_parameter(field, "must be a valid value"))
}

fn parse_id(field: &str, value: &str) -> AppResult<Option<Uuid>> {
    if value.is_empty() {
        return Ok(None);
    }
    Uuid::parse_str(value)
        .map(Some)
        .map_err(|_| AppError::invalid_parameter(field, "must be a valid UUID"))
}

fn log_step(step: &'static str) -> impl Fn(AppError) -> AppError {
    move |err| {
        tracing::error!(step, code = err.code(), error = %err, "User service call failed");
        err
    }
}
