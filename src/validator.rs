//! Request extractors that deserialize and then validate.
//!
//! Malformed JSON bodies are rejected with 400; query strings that fail to
//! parse and any `validator` failure are rejected with 422 and field-level
//! messages.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::request::Parts,
};
use rollcall_core::AppError;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Name of the offending field in a serde message such as
/// "missing field `specialty_id`".
fn quoted_field(message: &str, marker: &str) -> Option<String> {
    message
        .split(marker)
        .nth(1)
        .and_then(|rest| rest.split('`').next())
        .map(str::to_string)
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    let message = rejection.body_text();
    if let Some(field) = quoted_field(&message, "missing field `") {
        return AppError::bad_request(anyhow!("{} is required", field));
    }
    if message.contains("invalid type")
        || message.contains("invalid value")
        || message.contains("unknown variant")
    {
        return AppError::bad_request(anyhow!("Invalid field value in request: {}", message));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    let message = rejection.body_text();
    let field = quoted_field(&message, "field `").unwrap_or_else(|| "query".to_string());
    AppError::field(&field, message)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value.validate().map_err(|errors| AppError::validation(&errors))?;

        Ok(ValidatedJson(value))
    }
}

/// Query string counterpart of [`ValidatedJson`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;

        value.validate().map_err(|errors| AppError::validation(&errors))?;

        Ok(ValidatedQuery(value))
    }
}
