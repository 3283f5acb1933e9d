use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Standard response envelope shared by successes and failures.
///
/// `code` is the HTTP status zero-padded to four digits and `description`
/// its reason phrase in upper snake case (`SUCCESS` for 200).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    status: StatusCode,
    pub code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: Option<T>) -> Self {
        Self {
            status,
            code: format!("{:04}", status.as_u16()),
            description: status_description(status),
            data,
        }
    }

    pub fn success(data: T) -> Self {
        Self::new(StatusCode::OK, Some(data))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// Upper snake case reason phrase for a status.
pub fn status_description(status: StatusCode) -> String {
    if status == StatusCode::OK {
        return "SUCCESS".to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .filter(|c| *c != '\'')
        .collect()
}

/// 200 response carrying data
pub struct Success<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> axum::response::Response {
        ApiResponse::success(self.0).into_response()
    }
}

/// Created response helper (common pattern for POST endpoints)
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        ApiResponse::new(StatusCode::CREATED, Some(self.0)).into_response()
    }
}

/// 200 response without data (update and delete)
pub struct Acknowledged;

impl IntoResponse for Acknowledged {
    fn into_response(self) -> axum::response::Response {
        ApiResponse::<()>::new(StatusCode::OK, None).into_response()
    }
}
