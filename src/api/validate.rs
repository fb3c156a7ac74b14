use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::ApiError;

/// JSON extractor that runs declared validation rules after deserialization.
/// Unknown fields are ignored; rule failures become a 400 with field-level
/// messages inside the standard error envelope.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| validation_api_error(&errors))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten validator errors into the `field_errors` map. Field names are
/// reported in the wire format (camelCase), matching the request body keys.
pub fn validation_api_error(errors: &ValidationErrors) -> ApiError {
    let mut field_errors = HashMap::new();

    for (field, kind) in errors.errors() {
        if let ValidationErrorsKind::Field(list) = kind {
            if let Some(first) = list.first() {
                let field_name = snake_to_camel(field);
                let message = match &first.message {
                    Some(msg) => msg.to_string(),
                    None => default_message(&field_name, &first.code),
                };
                field_errors.insert(field_name, message);
            }
        }
    }

    // Single-field failures surface their message at the top level
    let message = if field_errors.len() == 1 {
        field_errors.values().next().cloned().unwrap_or_default()
    } else {
        "Validation failed".to_string()
    };

    ApiError::validation_error(message, Some(field_errors))
}

fn default_message(field: &str, code: &str) -> String {
    match code {
        "required" => format!("{} is required", field),
        _ => format!("{} is invalid", field),
    }
}

fn snake_to_camel(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
