//! User handlers.

use axum::{
    extract::State,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::validators::{
    validate_bool, validate_digits, validate_email_list, validate_order_by, validate_safe_text,
    validate_sort_by, validate_uuid,
};
use crate::api::extractors::{ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::api::AppState;
use crate::domain::{CreateUser, PaginatorResponse, ReadUserRequest, UpdateUser, User};
use crate::errors::{AppError, AppResult};
use crate::types::{Acknowledged, Created, Success};

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "cannot be blank"),
        custom(function = "validate_safe_text", message = "the name contains unsafe characters")
    )]
    #[schema(example = "Andrea Adam")]
    pub name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "cannot be blank"),
        custom(function = "validate_email_list", message = "must be a valid email address")
    )]
    #[schema(example = json!(["andrea.adam@example.com"]))]
    pub emails: Vec<String>,
}

/// Update user request; omitted or empty fields keep stored values
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(custom(
        function = "validate_safe_text",
        message = "the name contains unsafe characters"
    ))]
    #[schema(example = "Andrea Adam")]
    pub name: Option<String>,
    #[validate(custom(function = "validate_email_list", message = "must be a valid email address"))]
    pub emails: Option<Vec<String>>,
}

/// List query parameters, all optional
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// 1-based page number
    #[validate(custom(function = "validate_digits", message = "must contain digits only"))]
    pub page: String,
    /// Page size, 20 when omitted or zero
    #[validate(custom(function = "validate_digits", message = "must contain digits only"))]
    pub limit: String,
    /// One of id, name, createdAt, updatedAt
    #[validate(custom(function = "validate_order_by", message = "must be a valid value"))]
    pub order_by: String,
    /// asc or desc
    #[validate(custom(function = "validate_sort_by", message = "must be a valid value"))]
    pub sort_by: String,
    /// Substring of the user name
    #[validate(custom(
        function = "validate_safe_text",
        message = "the search contains unsafe characters"
    ))]
    pub search: String,
    /// Skip the total count query
    #[validate(custom(function = "validate_bool", message = "must be a valid value"))]
    pub disable_calculate_total: String,
    /// Exact user id
    #[validate(custom(function = "validate_uuid", message = "must be a valid UUID"))]
    pub id: String,
}

impl From<ListUsersQuery> for ReadUserRequest {
    fn from(query: ListUsersQuery) -> Self {
        Self {
            page: query.page,
            limit: query.limit,
            order_by: query.order_by,
            sort_by: query.sort_by,
            search: query.search,
            disable_calculate_total: query.disable_calculate_total,
            id: query.id,
        }
    }
}

/// `:id` path segment
#[derive(Debug, Deserialize, Validate)]
pub struct UserIdPath {
    #[validate(
        length(min = 1, message = "cannot be blank"),
        custom(function = "validate_uuid", message = "must be a valid UUID")
    )]
    pub id: String,
}

impl UserIdPath {
    fn uuid(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.id).map_err(|_| AppError::invalid_parameter("id", "must be a valid UUID"))
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(read_users).post(create_user))
        .route("/:id", patch(update_user).delete(delete_user))
}

/// Create a user with its emails
#[utoipa::path(
    post,
    path = "/api/v1/user",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created, returned as envelope data", body = User),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Duplicate email or storage failure")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<User>> {
    let user = state
        .user_service
        .create(CreateUser {
            name: payload.name,
            emails: payload.emails,
        })
        .await?;

    Ok(Created(user))
}

/// Page through users
#[utoipa::path(
    get,
    path = "/api/v1/user",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users, returned as envelope data", body = PaginatorResponse),
        (status = 400, description = "Invalid query parameter")
    )
)]
pub async fn read_users(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> AppResult<Success<PaginatorResponse>> {
    let page = state.user_service.read(query.into()).await?;
    Ok(Success(page))
}

/// Update a user's name and/or replace its emails
#[utoipa::path(
    patch,
    path = "/api/v1/user/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated"),
        (status = 400, description = "Validation error"),
        (status = 500, description = "User missing, duplicate email or storage failure")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    ValidatedPath(path): ValidatedPath<UserIdPath>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Acknowledged> {
    state
        .user_service
        .update(UpdateUser {
            id: path.uuid()?,
            name: payload.name,
            emails: payload.emails,
        })
        .await?;

    Ok(Acknowledged)
}

/// Delete a user and its emails
#[utoipa::path(
    delete,
    path = "/api/v1/user/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Invalid user ID"),
        (status = 500, description = "User missing or storage failure")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    ValidatedPath(path): ValidatedPath<UserIdPath>,
) -> AppResult<Acknowledged> {
    state.user_service.delete(path.uuid()?).await?;
    Ok(Acknowledged)
}
