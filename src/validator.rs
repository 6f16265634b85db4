use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use scholaris_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

fn validation_failed(errors: &ValidationErrors) -> AppError {
    AppError::new(
        StatusCode::UNPROCESSABLE_ENTITY,
        anyhow!("{}", format_errors(errors)),
    )
}

/// Maps a serde error message to a 400.
fn deserialize_failed(error_msg: &str) -> AppError {
    if error_msg.contains("missing field") {
        let field = error_msg
            .split("missing field `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("unknown");
        return AppError::new(StatusCode::BAD_REQUEST, anyhow!("{} is required", field));
    }

    if error_msg.contains("invalid type") {
        return AppError::new(
            StatusCode::BAD_REQUEST,
            anyhow!("Invalid field type in request"),
        );
    }

    AppError::new(StatusCode::BAD_REQUEST, anyhow!("Invalid request body"))
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
            .map_err(|rejection| {
                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow!("Missing 'Content-Type: application/json' header"),
                    );
                }
                deserialize_failed(&rejection.body_text())
            })?;

        value.validate().map_err(|errors| validation_failed(&errors))?;

        Ok(ValidatedJson(value))
    }
}

/// Deserializes and validates a body whose type is only known after routing,
/// such as the per-role registration payloads. Code format errors keep their
/// own message.
pub fn from_json_value<T>(value: serde_json::Value) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = serde_json::from_value(value).map_err(|e| {
        let msg = e.to_string();
        if msg.contains("missing field") || msg.contains("invalid type") {
            deserialize_failed(&msg)
        } else {
            AppError::new(StatusCode::BAD_REQUEST, anyhow!("{}", msg))
        }
    })?;

    parsed.validate().map_err(|errors| validation_failed(&errors))?;
    Ok(parsed)
}
