//! Demo data for local development.

use chrono::{FixedOffset, SubsecRound, Utc};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set, TransactionTrait,
};
use uuid::{uuid, Uuid};

use crate::infra::repositories::entities::{email, user};

struct DemoUser {
    id: Uuid,
    name: &'static str,
    emails: &'static [(Uuid, &'static str)],
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        id: uuid!("09123ae8-cce2-4d40-aac1-ae1b3c51cc77"),
        name: "Andrea Adam",
        emails: &[
            (
                uuid!("092fa1d6-aea8-4a0d-86d1-1c242d0f8ce5"),
                "andrea.adam@example.com",
            ),
            (
                uuid!("902872a1-3c73-4fc5-8b9a-269203209d68"),
                "andrea.adam@example.org",
            ),
        ],
    },
    DemoUser {
        id: uuid!("7f5abfff-fae9-4c0d-8433-50f650583dac"),
        name: "Zelda Skyward",
        emails: &[(
            uuid!("61e5efb6-5da0-470f-a3ee-1109a2ea590e"),
            "zelda.skyward@example.com",
        )],
    },
];

/// Counts of rows inserted by a seed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: u64,
    pub emails: u64,
}

/// Insert the demo users and emails. Rows whose primary key already exists are skipped.
pub async fn seed_demo_data(
    db: &DatabaseConnection,
    offset: FixedOffset,
) -> Result<SeedReport, DbErr> {
    let now = Utc::now().with_timezone(&offset).trunc_subsecs(6);
    let txn = db.begin().await?;
    let mut report = SeedReport::default();

    for demo in DEMO_USERS {
        if user::Entity::find_by_id(demo.id).one(&txn).await?.is_none() {
            user::ActiveModel {
                id: Set(demo.id),
                name: Set(demo.name.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
            }
            .insert(&txn)
            .await?;
            report.users += 1;
        }

        for (email_id, address) in demo.emails {
            if email::Entity::find_by_id(*email_id).one(&txn).await?.is_some() {
                continue;
            }

            email::ActiveModel {
                id: Set(*email_id),
                user_id: Set(demo.id),
                email: Set(address.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
            }
            .insert(&txn)
            .await?;
            report.emails += 1;
        }
    }

    txn.commit().await?;
    Ok(report)
}
