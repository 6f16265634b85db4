//! Authentication request and response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::actor::Actor;
use crate::status::ActorStatus;

pub use scholaris_auth::Claims;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 72))]
    #[schema(example = "password123")]
    pub password: String,
}

/// `{"token": "...", "<role>": {...}}`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub actor: Actor,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, max = 72))]
    pub current_password: String,
    #[validate(length(min = 8, max = 72))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    pub status: ActorStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let request = LoginRequest {
            email: "nope".to_string(),
            password: String::new(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_status_update_parses_lowercase() {
        let request: StatusUpdateRequest =
            serde_json::from_value(serde_json::json!({"status": "suspended"})).unwrap();
        assert_eq!(request.status, ActorStatus::Suspended);
        assert!(
            serde_json::from_value::<StatusUpdateRequest>(serde_json::json!({"status": "gone"}))
                .is_err()
        );
    }
}
