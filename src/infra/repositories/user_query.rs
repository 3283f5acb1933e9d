//! Paginated user query engine.
//!
//! Turns a [`ReadUserData`] into a whitelisted, escaped SeaORM select. Two
//! plans share the same filters: the fetch plan (ordered, paged, emails loaded
//! in one extra `IN` query) and the optional count plan.

use sea_orm::{
    sea_query::LikeExpr, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, LoaderTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::entities::{email, user};
use crate::domain::{PaginatorResponse, ReadUserData};
use crate::types::PaginationParams;

/// Column a page may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

impl OrderField {
    /// Unknown values fall back to `name`.
    pub fn parse(value: &str) -> Self {
        match value {
            "id" => OrderField::Id,
            "createdAt" => OrderField::CreatedAt,
            "updatedAt" => OrderField::UpdatedAt,
            _ => OrderField::Name,
        }
    }

    fn column(self) -> user::Column {
        match self {
            OrderField::Id => user::Column::Id,
            OrderField::Name => user::Column::Name,
            OrderField::CreatedAt => user::Column::CreatedAt,
            OrderField::UpdatedAt => user::Column::UpdatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Only the exact value `desc` sorts descending; anything else is `asc`.
    pub fn parse(value: &str) -> Self {
        match value {
            "desc" => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    fn order(self) -> Order {
        match self {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// Escape `LIKE` wildcards so the search term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Normalised list query over active users.
#[derive(Debug, Clone)]
pub struct UserQuery {
    pagination: PaginationParams,
    order_by: OrderField,
    sort_by: SortDirection,
    search: Option<String>,
    id: Option<Uuid>,
    count_total: bool,
}

impl UserQuery {
    pub fn new(data: &ReadUserData) -> Self {
        let search = Some(data.search.clone()).filter(|s| !s.is_empty());

        Self {
            pagination: PaginationParams::new(data.page, data.limit),
            order_by: OrderField::parse(&data.order_by),
            sort_by: SortDirection::parse(&data.sort_by),
            search,
            id: data.id,
            count_total: !data.disable_calculate_total,
        }
    }

    pub fn pagination(&self) -> PaginationParams {
        self.pagination
    }

    pub fn order_by(&self) -> OrderField {
        self.order_by
    }

    pub fn sort_by(&self) -> SortDirection {
        self.sort_by
    }

    /// Filters shared by both plans. An id filter replaces the search filter.
    fn filtered(&self) -> Select<user::Entity> {
        let select = user::Entity::find().filter(user::Column::DeletedAt.is_null());

        match (&self.id, &self.search) {
            (Some(id), _) => select.filter(user::Column::Id.eq(*id)),
            (None, Some(term)) => {
                let pattern = format!("%{}%", escape_like(term));
                select.filter(user::Column::Name.like(LikeExpr::new(pattern).escape('\\')))
            }
            (None, None) => select,
        }
    }

    fn fetch_plan(&self) -> Select<user::Entity> {
        self.filtered()
            .order_by(self.order_by.column(), self.sort_by.order())
            .order_by_asc(user::Column::Id)
            .limit(self.pagination.limit())
            .offset(self.pagination.offset())
    }

    /// Run the count (unless disabled) and fetch plans.
    pub async fn execute<C>(&self, db: &C) -> Result<PaginatorResponse, DbErr>
    where
        C: ConnectionTrait,
    {
        let total = if self.count_total {
            self.filtered().count(db).await?
        } else {
            0
        };

        let users = self.fetch_plan().all(db).await?;
        let emails = users
            .load_many(
                email::Entity::find().order_by_asc(email::Column::CreatedAt),
                db,
            )
            .await?;

        let next_page = self.pagination.has_next_page(users.len());
        let records = users
            .into_iter()
            .zip(emails)
            .map(|(user, emails)| user.into_domain(emails))
            .collect();

        Ok(PaginatorResponse {
            records,
            total,
            next_page,
        })
    }
}
