//! User repository: transactional writes over users and their emails.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, SubsecRound, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use super::user_query::UserQuery;
use crate::domain::{CreateUserData, PaginatorResponse, ReadUserData, UpdateUserData, User};
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Every write runs in a single transaction: either all rows change or none.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and one email row per address
    async fn create(&self, data: CreateUserData) -> AppResult<User>;

    /// Page through active users
    async fn read(&self, data: ReadUserData) -> AppResult<PaginatorResponse>;

    /// Rename and/or replace the email set of a user
    async fn update(&self, data: UpdateUserData) -> AppResult<User>;

    /// Remove a user together with its emails
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed implementation of [`UserRepository`]
pub struct UserStore {
    persistence: Persistence,
    offset: FixedOffset,
}

impl UserStore {
    /// `offset` is the zone every created/updated timestamp is stamped in.
    pub fn new(db: DatabaseConnection, offset: FixedOffset) -> Self {
        Self {
            persistence: Persistence::new(db),
            offset,
        }
    }

    // Storage keeps microseconds; truncate so responses match what is read back.
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset).trunc_subsecs(6)
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, data: CreateUserData) -> AppResult<User> {
        let now = self.now();

        self.persistence
            .transaction(move |ctx| {
                Box::pin(async move {
                    let users = ctx.users();
                    let user = users.insert_user(data.name, now).await?;
                    let emails = users.insert_emails(user.id, data.emails, now).await?;
                    Ok(user.into_domain(emails))
                })
            })
            .await
    }

    async fn read(&self, data: ReadUserData) -> AppResult<PaginatorResponse> {
        UserQuery::new(&data)
            .execute(self.persistence.connection())
            .await
            .map_err(|e| {
                tracing::error!(step = "read_users", error = %e, "Failed to read users");
                AppError::from(e)
            })
    }

    async fn update(&self, data: UpdateUserData) -> AppResult<User> {
        let now = self.now();

        self.persistence
            .transaction(move |ctx| {
                Box::pin(async move {
                    let users = ctx.users();
                    let current = users.find_user(data.id).await?;

                    let name = data.name.filter(|name| !name.is_empty());
                    let emails = match data.emails.filter(|emails| !emails.is_empty()) {
                        Some(addresses) => {
                            users.delete_emails_of(current.id).await?;
                            users.insert_emails(current.id, addresses, now).await?
                        }
                        None => users.find_emails_of(current.id).await?,
                    };

                    let saved = users.save_user(current, name, now).await?;
                    Ok(saved.into_domain(emails))
                })
            })
            .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.persistence
            .transaction(move |ctx| {
                Box::pin(async move {
                    let users = ctx.users();
                    users.find_user(id).await?;
                    // Emails first so the foreign key never dangles
                    users.delete_emails_of(id).await?;
                    users.delete_user(id).await
                })
            })
            .await
    }
}
