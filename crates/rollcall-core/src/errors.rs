//! Application error type.
//!
//! Every fallible handler and service returns [`AppError`], which pairs an
//! HTTP status with an [`anyhow::Error`] and, for validation failures, a map
//! of field-level messages.
//!
//! Response body:
//!
//! ```json
//! { "error": "Validation failed", "fields": { "start_time": ["start_time is invalid"] } }
//! ```

use std::collections::BTreeMap;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::{ValidationErrors, ValidationErrorsKind};

pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub fields: Option<FieldErrors>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            fields: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn forbidden<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::FORBIDDEN, err)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    /// 422 carrying one message per invalid field.
    pub fn validation(errors: &ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        collect_field_errors(errors, None, &mut fields);

        let summary = fields
            .values()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error: anyhow::anyhow!("Validation failed: {}", summary),
            fields: Some(fields),
        }
    }

    /// 422 for a single named field.
    pub fn field<M>(field: &str, message: M) -> Self
    where
        M: Into<String>,
    {
        let message = message.into();
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.clone()]);

        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error: anyhow::anyhow!(message),
            fields: Some(fields),
        }
    }
}

fn collect_field_errors(errors: &ValidationErrors, prefix: Option<&str>, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors.iter().map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", path))
                });
                out.entry(path.clone()).or_default().extend(messages);
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_field_errors(nested, Some(&path), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    let item_path = format!("{}[{}]", path, index);
                    collect_field_errors(nested, Some(&item_path), out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = ?self.error, status = %self.status, "request failed");
        }

        let body = match self.fields {
            Some(fields) => json!({
                "error": self.error.to_string(),
                "fields": fields,
            }),
            None => json!({
                "error": self.error.to_string()
            }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Line {
        #[validate(length(max = 3, message = "note is too long"))]
        note: String,
    }

    #[derive(Validate)]
    struct Batch {
        #[validate(length(min = 1))]
        label: String,
        #[validate(nested)]
        lines: Vec<Line>,
    }

    #[test]
    fn test_validation_collects_nested_paths() {
        let batch = Batch {
            label: String::new(),
            lines: vec![
                Line {
                    note: "ok".to_string(),
                },
                Line {
                    note: "too long".to_string(),
                },
            ],
        };

        let errors = batch.validate().unwrap_err();
        let app_error = AppError::validation(&errors);
        let fields = app_error.fields.unwrap();

        assert_eq!(app_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(fields["label"], vec!["label is invalid".to_string()]);
        assert_eq!(fields["lines[1].note"], vec!["note is too long".to_string()]);
        assert!(!fields.contains_key("lines[0].note"));
    }

    #[test]
    fn test_field_error() {
        let error = AppError::field("date", "date must be YYYY-MM-DD");
        assert_eq!(error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error.error.to_string(), "date must be YYYY-MM-DD");
        assert_eq!(error.fields.unwrap()["date"].len(), 1);
    }

    #[test]
    fn test_blanket_conversion_is_internal() {
        let error: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
