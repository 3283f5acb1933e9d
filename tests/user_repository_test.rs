//! User repository tests against an in-memory SQLite database.

use std::time::Duration;

use chrono::{FixedOffset, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use crud_api_starter::domain::{CreateUserData, ReadUserData, UpdateUserData, User};
use crud_api_starter::errors::{AppError, AppResult, PersistenceFailure};
use crud_api_starter::infra::{Migrator, Persistence, UserRepository, UserStore};

/// Fresh database per test; one connection so the in-memory schema is shared
async fn create_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

fn test_offset() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).unwrap()
}

async fn create_test_store() -> UserStore {
    UserStore::new(create_test_db().await, test_offset())
}

const BLOCKED_EMAIL: &str = "blocked@example.com";

/// Store whose database aborts any insert of [`BLOCKED_EMAIL`]
async fn create_failing_email_store() -> UserStore {
    let db = create_test_db().await;
    db.execute_unprepared(&format!(
        "CREATE TRIGGER reject_blocked_email BEFORE INSERT ON emails \
         WHEN NEW.email = '{BLOCKED_EMAIL}' \
         BEGIN SELECT RAISE(ABORT, 'blocked email'); END;"
    ))
    .await
    .expect("Failed to install trigger");

    UserStore::new(db, test_offset())
}

async fn create_user(store: &UserStore, name: &str, emails: &[&str]) -> User {
    store
        .create(CreateUserData {
            name: name.to_string(),
            emails: emails.iter().map(|e| e.to_string()).collect(),
        })
        .await
        .expect("create user")
}

async fn read_by_id(store: &UserStore, id: Uuid) -> Vec<User> {
    store
        .read(ReadUserData {
            id: Some(id),
            ..Default::default()
        })
        .await
        .expect("read user")
        .records
}

fn sorted_addresses(user: &User) -> Vec<String> {
    let mut addresses: Vec<String> = user.emails.iter().map(|e| e.email.clone()).collect();
    addresses.sort();
    addresses
}

fn names(users: &[User]) -> Vec<&str> {
    users.iter().map(|u| u.name.as_str()).collect()
}

#[tokio::test]
async fn test_create_then_read_by_id_round_trips() {
    let store = create_test_store().await;

    let created = create_user(&store, "Andrea Adam", &["a@example.com", "b@example.com"]).await;

    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(created.created_at.offset().local_minus_utc(), 7 * 3600);
    assert_eq!(created.emails.len(), 2);
    assert!(created.emails.iter().all(|e| e.user_id == created.id));
    assert!(created.emails.iter().all(|e| e.created_at == created.created_at));

    let found = read_by_id(&store, created.id).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, created.id);
    assert_eq!(found[0].name, "Andrea Adam");
    assert_eq!(sorted_addresses(&found[0]), vec!["a@example.com", "b@example.com"]);
}

#[tokio::test]
async fn test_next_page_is_true_only_for_full_pages() {
    let store = create_test_store().await;
    for name in ["Alpha", "Bravo", "Charlie"] {
        create_user(&store, name, &[]).await;
    }

    let first = store
        .read(ReadUserData {
            page: 1,
            limit: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(names(&first.records), vec!["Alpha", "Bravo"]);
    assert_eq!(first.total, 3);
    assert!(first.next_page);

    let second = store
        .read(ReadUserData {
            page: 2,
            limit: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(names(&second.records), vec!["Charlie"]);
    assert!(!second.next_page);
}

#[tokio::test]
async fn test_unknown_order_and_sort_fall_back_to_name_ascending() {
    let store = create_test_store().await;
    for name in ["Zelda", "Andrea", "Mira"] {
        create_user(&store, name, &[]).await;
    }

    let fallback = store
        .read(ReadUserData {
            order_by: "email".to_string(),
            sort_by: "sideways".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(names(&fallback.records), vec!["Andrea", "Mira", "Zelda"]);

    let descending = store
        .read(ReadUserData {
            order_by: "name".to_string(),
            sort_by: "desc".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(names(&descending.records), vec!["Zelda", "Mira", "Andrea"]);
}

#[tokio::test]
async fn test_search_matches_wildcards_literally() {
    let store = create_test_store().await;
    create_user(&store, "100% Real", &[]).await;
    create_user(&store, "1000 Real", &[]).await;
    create_user(&store, "Other", &[]).await;

    let percent = store
        .read(ReadUserData {
            search: "100%".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(names(&percent.records), vec!["100% Real"]);
    assert_eq!(percent.total, 1);

    let substring = store
        .read(ReadUserData {
            search: "Real".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(substring.records.len(), 2);
}

#[tokio::test]
async fn test_id_filter_ignores_search() {
    let store = create_test_store().await;
    let user = create_user(&store, "Andrea Adam", &[]).await;

    let page = store
        .read(ReadUserData {
            id: Some(user.id),
            search: "does not match".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.records.len(), 1);
}

#[tokio::test]
async fn test_disable_calculate_total_reports_zero() {
    let store = create_test_store().await;
    create_user(&store, "Andrea Adam", &[]).await;

    let page = store
        .read(ReadUserData {
            disable_calculate_total: true,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total, 0);
    assert_eq!(page.records.len(), 1);
}

#[tokio::test]
async fn test_update_with_new_emails_replaces_all_prior_rows() {
    let store = create_test_store().await;
    let user = create_user(&store, "Andrea Adam", &["a@example.com", "b@example.com"]).await;

    let updated = store
        .update(UpdateUserData {
            id: user.id,
            name: Some("Andrea Eve".to_string()),
            emails: Some(vec!["c@example.com".to_string()]),
        })
        .await
        .unwrap();

    assert_eq!(updated.name, "Andrea Eve");
    assert_eq!(sorted_addresses(&updated), vec!["c@example.com"]);

    let found = read_by_id(&store, user.id).await;
    assert_eq!(found[0].name, "Andrea Eve");
    assert_eq!(sorted_addresses(&found[0]), vec!["c@example.com"]);
}

#[tokio::test]
async fn test_update_with_empty_emails_keeps_them_and_touches_updated_at() {
    let store = create_test_store().await;
    let user = create_user(&store, "Andrea Adam", &["a@example.com"]).await;

    tokio::time::sleep(Duration::from_millis(5)).await;

    let updated = store
        .update(UpdateUserData {
            id: user.id,
            name: Some(String::new()),
            emails: Some(vec![]),
        })
        .await
        .unwrap();

    assert_eq!(updated.name, "Andrea Adam");
    assert_eq!(sorted_addresses(&updated), vec!["a@example.com"]);
    assert!(updated.updated_at > user.updated_at);
    assert_eq!(updated.created_at, user.created_at);

    let found = read_by_id(&store, user.id).await;
    assert_eq!(found[0].updated_at, updated.updated_at);
    assert_eq!(found[0].emails.len(), 1);
}

#[tokio::test]
async fn test_update_unknown_user_fails_reading() {
    let store = create_test_store().await;

    let result = store
        .update(UpdateUserData {
            id: Uuid::new_v4(),
            name: Some("Nobody".to_string()),
            emails: None,
        })
        .await;

    assert!(matches!(
        result,
        Err(AppError::Persistence(PersistenceFailure::ReadUser))
    ));
}

#[tokio::test]
async fn test_delete_removes_user_and_emails() {
    let store = create_test_store().await;
    let user = create_user(&store, "Andrea Adam", &["a@example.com", "b@example.com"]).await;
    let other = create_user(&store, "Zelda Skyward", &["z@example.com"]).await;

    store.delete(user.id).await.unwrap();

    assert!(read_by_id(&store, user.id).await.is_empty());
    let remaining = read_by_id(&store, other.id).await;
    assert_eq!(sorted_addresses(&remaining[0]), vec!["z@example.com"]);

    let again = store.delete(user.id).await;
    assert!(matches!(
        again,
        Err(AppError::Persistence(PersistenceFailure::ReadUser))
    ));
}

#[tokio::test]
async fn test_user_without_emails_can_be_updated_and_deleted() {
    let store = create_test_store().await;
    let user = create_user(&store, "Solo", &[]).await;

    let updated = store
        .update(UpdateUserData {
            id: user.id,
            name: None,
            emails: None,
        })
        .await
        .unwrap();
    assert!(updated.emails.is_empty());

    store.delete(user.id).await.unwrap();
    assert!(read_by_id(&store, user.id).await.is_empty());
}

#[tokio::test]
async fn test_limit_above_one_hundred_returns_full_page() {
    let store = create_test_store().await;
    for i in 0..150 {
        create_user(&store, &format!("User {i:03}"), &[]).await;
    }

    let page = store
        .read(ReadUserData {
            page: 1,
            limit: 150,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.records.len(), 150);
    assert_eq!(page.total, 150);
    assert!(page.next_page);

    let page = store
        .read(ReadUserData {
            page: 1,
            limit: 151,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.records.len(), 150);
    assert!(!page.next_page);
}

#[tokio::test]
async fn test_page_beyond_bind_range_is_empty() {
    let store = create_test_store().await;
    create_user(&store, "Andrea Adam", &["a@example.com"]).await;

    for page in [9_223_372_036_854_775_808, u64::MAX] {
        let result = store
            .read(ReadUserData {
                page,
                limit: 20,
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(result.records.is_empty());
        assert_eq!(result.total, 1);
        assert!(!result.next_page);
    }
}

#[tokio::test]
async fn test_failed_email_insert_rolls_back_update() {
    let store = create_failing_email_store().await;
    let user = create_user(&store, "Andrea Adam", &["a@example.com", "b@example.com"]).await;

    tokio::time::sleep(Duration::from_millis(5)).await;

    // Old emails are deleted and the first new one inserted before the
    // second insert aborts.
    let result = store
        .update(UpdateUserData {
            id: user.id,
            name: Some("Andrea Eve".to_string()),
            emails: Some(vec!["c@example.com".to_string(), BLOCKED_EMAIL.to_string()]),
        })
        .await;
    assert!(matches!(result, Err(AppError::Database(_))));

    let found = read_by_id(&store, user.id).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Andrea Adam");
    assert_eq!(found[0].updated_at, user.updated_at);
    assert_eq!(sorted_addresses(&found[0]), vec!["a@example.com", "b@example.com"]);
}

#[tokio::test]
async fn test_failed_email_insert_rolls_back_create() {
    let store = create_failing_email_store().await;

    let result = store
        .create(CreateUserData {
            name: "Andrea Adam".to_string(),
            emails: vec!["a@example.com".to_string(), BLOCKED_EMAIL.to_string()],
        })
        .await;
    assert!(matches!(result, Err(AppError::Database(_))));

    let page = store.read(ReadUserData::default()).await.unwrap();
    assert!(page.records.is_empty());
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_transaction_error_discards_completed_steps() {
    let db = create_test_db().await;
    let persistence = Persistence::new(db.clone());
    let now = Utc::now().with_timezone(&test_offset());

    let result: AppResult<()> = persistence
        .transaction(move |ctx| {
            Box::pin(async move {
                let users = ctx.users();
                let user = users.insert_user("Andrea Adam".to_string(), now).await?;
                users
                    .insert_emails(user.id, vec!["a@example.com".to_string()], now)
                    .await?;
                Err(AppError::internal("abort after writes"))
            })
        })
        .await;
    assert!(matches!(result, Err(AppError::Internal(_))));

    let store = UserStore::new(db, test_offset());
    let page = store.read(ReadUserData::default()).await.unwrap();
    assert!(page.records.is_empty());
    assert_eq!(page.total, 0);
}
