//! Validated extractors - Combine deserialization with validation.
//!
//! Deserialization failures become `400` with the rejection text as data;
//! validation failures become `400` with a field to message map.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::errors::{AppError, FieldErrors};

/// Validated JSON body.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use crud_api_starter::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct CreateUserRequest {
///     #[validate(length(min = 1, message = "cannot be blank"))]
///     name: String,
/// }
///
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUserRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        validate(value).map(ValidatedJson)
    }
}

/// Validated query string.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| AppError::bad_request(e.body_text()))?;

        validate(value).map(ValidatedQuery)
    }
}

/// Validated path parameters.
pub struct ValidatedPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| AppError::bad_request(e.body_text()))?;

        validate(value).map(ValidatedPath)
    }
}

fn validate<T: Validate>(value: T) -> Result<T, AppError> {
    value
        .validate()
        .map_err(|e| AppError::validation(field_errors(&e)))?;
    Ok(value)
}

/// First message per field, keyed by the camelCase field name.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .iter()
        .filter_map(|(field, errs)| {
            let first = errs.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| fallback_message(&first.code));
            Some((camel_case(field), message))
        })
        .collect()
}

fn fallback_message(code: &str) -> String {
    match code {
        "length" | "required" => "cannot be blank",
        "email" => "must be a valid email address",
        "uuid" => "must be a valid UUID",
        "digits" => "must contain digits only",
        "one_of" => "must be a valid value",
        _ => "is invalid",
    }
    .to_string()
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
