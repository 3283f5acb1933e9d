//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing. Every response body
//! is wrapped in the `{code, description, data}` envelope.

use utoipa::OpenApi;

use crate::api::handlers::{health_handler, user_handler};
use crate::domain::{Email, PaginatorResponse, User};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CRUD API Starter",
        version = "0.1.0",
        description = "User and email CRUD with paginated queries and transactional writes",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        health_handler::health,
        user_handler::create_user,
        user_handler::read_users,
        user_handler::update_user,
        user_handler::delete_user,
    ),
    components(
        schemas(
            User,
            Email,
            PaginatorResponse,
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
            health_handler::HealthResponse,
            health_handler::ServiceHealth,
            health_handler::ServiceStatus,
        )
    ),
    tags(
        (name = "Users", description = "User and email management"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;
