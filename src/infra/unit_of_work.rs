//! Unit of Work pattern implementation.
//!
//! Manages the transaction lifecycle (begin, commit, rollback) and exposes the
//! individual write steps of the user aggregate bound to one transaction.
//! Each step maps "nothing happened" outcomes to a [`PersistenceFailure`] so
//! callers can tell which step aborted the transaction.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::repositories::entities::{email, user};
use crate::errors::{AppError, AppResult, PersistenceFailure};

/// Boxed future returned by transactional closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Transaction context providing repository access within a transaction.
///
/// The context borrows the transaction, so it cannot outlive it.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository::new(self.txn)
    }
}

/// Owns the connection pool and runs closures inside transactions.
#[derive(Clone)]
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connection for non-transactional reads.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Execute a closure within a transaction.
    ///
    /// Commits when the closure succeeds, rolls back on any error. Uses the
    /// storage default isolation level.
    pub async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self.db.begin().await?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(error = %rollback_err, "Transaction rollback failed");
                }
                Err(e)
            }
        }
    }
}

/// Transaction-bound write steps for users and their emails.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert a new user row stamped with `now`.
    pub async fn insert_user(
        &self,
        name: String,
        now: DateTime<FixedOffset>,
    ) -> AppResult<user::Model> {
        let active = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        active
            .insert(self.txn)
            .await
            .map_err(|e| not_inserted(e, PersistenceFailure::CreateUser))
            .map_err(log_step("insert_user"))
    }

    /// Insert one email row per address, all owned by `user_id`.
    pub async fn insert_emails(
        &self,
        user_id: Uuid,
        addresses: Vec<String>,
        now: DateTime<FixedOffset>,
    ) -> AppResult<Vec<email::Model>> {
        let mut inserted = Vec::with_capacity(addresses.len());

        for address in addresses {
            let active = email::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                email: Set(address),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
            };

            let model = active
                .insert(self.txn)
                .await
                .map_err(|e| not_inserted(e, PersistenceFailure::CreateEmail))
                .map_err(log_step("insert_email"))?;
            inserted.push(model);
        }

        Ok(inserted)
    }

    /// Load an active user, failing when it does not exist.
    pub async fn find_user(&self, id: Uuid) -> AppResult<user::Model> {
        user::Entity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(self.txn)
            .await
            .map_err(AppError::from)
            .and_then(|found| found.ok_or_else(|| PersistenceFailure::ReadUser.into()))
            .map_err(log_step("find_user"))
    }

    /// Emails of a user, oldest first. An empty list is not an error.
    pub async fn find_emails_of(&self, user_id: Uuid) -> AppResult<Vec<email::Model>> {
        email::Entity::find()
            .filter(email::Column::UserId.eq(user_id))
            .order_by_asc(email::Column::CreatedAt)
            .all(self.txn)
            .await
            .map_err(AppError::from)
            .map_err(log_step("find_emails"))
    }

    /// Remove every email of a user and return how many were removed.
    pub async fn delete_emails_of(&self, user_id: Uuid) -> AppResult<u64> {
        let result = email::Entity::delete_many()
            .filter(email::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)
            .map_err(log_step("delete_emails"))?;

        Ok(result.rows_affected)
    }

    /// Persist a new name (when given) and refresh `updated_at`.
    pub async fn save_user(
        &self,
        current: user::Model,
        name: Option<String>,
        now: DateTime<FixedOffset>,
    ) -> AppResult<user::Model> {
        let mut active: user::ActiveModel = current.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        active.updated_at = Set(now);

        active
            .update(self.txn)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => PersistenceFailure::UpdateUser.into(),
                other => AppError::from(other),
            })
            .map_err(log_step("save_user"))
    }

    /// Hard delete a user row.
    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)
            .map_err(log_step("delete_user"))?;

        if result.rows_affected == 0 {
            let err = AppError::from(PersistenceFailure::DeleteUser);
            return Err(log_step("delete_user")(err));
        }

        Ok(())
    }
}

fn not_inserted(err: DbErr, failure: PersistenceFailure) -> AppError {
    match err {
        DbErr::RecordNotInserted => AppError::Persistence(failure),
        other => AppError::from(other),
    }
}

fn log_step(step: &'static str) -> impl Fn(AppError) -> AppError {
    move |err| {
        tracing::error!(step, code = err.code(), error = %err, "User persistence step failed");
        err
    }
}
