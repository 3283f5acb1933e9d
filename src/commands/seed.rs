//! Seed command - Inserts demo data.

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::db::seed_demo_data;
use crate::infra::Database;

/// Execute the seed command. Applies pending migrations first.
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;

    let report = seed_demo_data(db.connection(), config.timezone).await?;
    tracing::info!(
        users = report.users,
        emails = report.emails,
        "Seeding completed"
    );

    Ok(())
}
