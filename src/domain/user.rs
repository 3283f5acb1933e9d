//! User aggregate and related types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User domain entity together with the emails it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = "09123ae8-cce2-4d40-aac1-ae1b3c51cc77")]
    pub id: Uuid,
    #[schema(example = "Andrea Adam")]
    pub name: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<FixedOffset>>,
    /// Ordered by creation time, oldest first
    #[serde(default)]
    pub emails: Vec<Email>,
}

/// Email address owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "andrea.adam@example.com")]
    pub email: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<FixedOffset>>,
}

impl User {
    /// Email addresses in stored order
    pub fn addresses(&self) -> Vec<&str> {
        self.emails.iter().map(|e| e.email.as_str()).collect()
    }
}

/// One page of users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatorResponse {
    pub records: Vec<User>,
    /// Matching rows across all pages; 0 when the count was skipped
    pub total: u64,
    pub next_page: bool,
}

// =============================================================================
// Service inputs
// =============================================================================

/// New user with its email addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub name: String,
    pub emails: Vec<String>,
}

/// Raw list parameters as received; empty strings mean "absent"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadUserRequest {
    pub page: String,
    pub limit: String,
    pub order_by: String,
    pub sort_by: String,
    pub search: String,
    pub disable_calculate_total: String,
    pub id: String,
}

/// Partial update; `None` or empty values keep the stored ones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub emails: Option<Vec<String>>,
}

// =============================================================================
// Repository inputs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserData {
    pub name: String,
    pub emails: Vec<String>,
}

/// Typed list query; unknown `order_by`/`sort_by` fall back to `name`/`asc`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadUserData {
    pub page: u64,
    pub limit: u64,
    pub order_by: String,
    pub sort_by: String,
    pub search: String,
    pub disable_calculate_total: bool,
    pub id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserData {
    pub id: Uuid,
    pub name: Option<String>,
    pub emails: Option<Vec<String>>,
}

impl From<CreateUser> for CreateUserData {
    fn from(input: CreateUser) -> Self {
        Self {
            name: input.name,
            emails: input.emails,
        }
    }
}

impl From<UpdateUser> for UpdateUserData {
    fn from(input: UpdateUser) -> Self {
        Self {
            id: input.id,
            name: input.name,
            emails: input.emails,
        }
    }
}
