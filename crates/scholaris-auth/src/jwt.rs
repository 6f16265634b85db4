//! HS256 access tokens.
//!
//! Tokens are signed with [`JwtConfig::secret`] and expire after
//! [`JwtConfig::expiry`] seconds. Verification rejects bad signatures,
//! expired tokens and malformed payloads with the same 401 message so the
//! client cannot tell them apart.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use scholaris_config::JwtConfig;
use scholaris_core::AppError;

use crate::claims::Claims;
use crate::roles::ActorRole;

pub fn create_access_token(
    actor_id: Uuid,
    role: ActorRole,
    natural_key: Option<&str>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.expiry as usize;

    let claims = Claims::new(actor_id.to_string(), role, natural_key, now, exp);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new("test-secret", 86_400)
    }

    #[test]
    fn test_create_and_verify() {
        let id = Uuid::new_v4();
        let token =
            create_access_token(id, ActorRole::Teacher, Some("te010m4567"), &config()).unwrap();
        let claims = verify_token(&token, &config()).unwrap();

        assert_eq!(claims.id, id.to_string());
        assert_eq!(claims.role, ActorRole::Teacher);
        assert_eq!(claims.teacher_id.as_deref(), Some("te010m4567"));
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let token = create_access_token(Uuid::new_v4(), ActorRole::Admin, None, &config()).unwrap();
        let err = verify_token(&token, &JwtConfig::new("other-secret", 60)).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims::new(
            Uuid::new_v4().to_string(),
            ActorRole::Student,
            None,
            now - 7_200,
            now - 3_600,
        );
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = verify_token(&token, &config()).unwrap_err();
        assert_eq!(err.error.to_string(), "Invalid or expired token");
    }

    #[test]
    fn test_garbage_is_unauthorized() {
        let err = verify_token("not.a.jwt", &config()).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }
}
