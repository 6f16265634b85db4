use axum::{
    extract::{FromRequestParts, Path, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use scholaris_auth::{ActorRole, verify_token};
use scholaris_core::AppError;
use scholaris_models::Actor;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::modules::actors::service::ActorService;
use crate::state::AppState;

/// The actor reloaded for the current request.
#[derive(Debug, Clone)]
pub struct AuthActor(pub Actor);

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format".to_string()))
}

/// Runs the authentication chain for a route that requires `required`.
pub async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    required: ActorRole,
) -> Result<Actor, AppError> {
    let token = bearer_token(headers)?;
    let claims = verify_token(token, &state.jwt_config)?;

    if claims.role != required {
        warn!(token_role = %claims.role, required_role = %required, "Role mismatch");
        return Err(AppError::forbidden(format!(
            "Access denied. This route requires the {} role",
            required
        )));
    }

    let actor_id = Uuid::parse_str(&claims.id)
        .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))?;

    let actor = ActorService::find_by_id(&state.db, required, actor_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Account no longer exists".to_string()))?;

    if !actor.status().is_active() {
        debug!(actor_id = %actor_id, status = %actor.status(), "Rejected inactive account");
        return Err(AppError::unauthorized(format!(
            "Account is {}",
            actor.status()
        )));
    }

    Ok(actor)
}

pub async fn require_role(
    state: &AppState,
    mut req: Request,
    next: Next,
    required: ActorRole,
) -> Result<Response, AppError> {
    let actor = authenticate(state, req.headers(), required).await?;
    req.extensions_mut().insert(AuthActor(actor));
    Ok(next.run(req).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&state, req, next, ActorRole::Admin).await
}

pub async fn require_student(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&state, req, next, ActorRole::Student).await
}

pub async fn require_teacher(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&state, req, next, ActorRole::Teacher).await
}

pub async fn require_coach(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&state, req, next, ActorRole::Coach).await
}

pub async fn require_librarian(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&state, req, next, ActorRole::Librarian).await
}

/// Requires the role named by the `{role}` path segment.
pub async fn require_path_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let required = parse_role(&role)?;
    require_role(&state, req, next, required).await
}

/// Parses a `{role}` path segment; unknown roles are 404.
pub fn parse_role(raw: &str) -> Result<ActorRole, AppError> {
    raw.parse::<ActorRole>()
        .map_err(|_| AppError::not_found(anyhow::anyhow!("Unknown role '{}'", raw)))
}

impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthActor>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_missing() {
        let headers = HeaderMap::new();
        let err = bearer_token(&headers).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers).unwrap_err().status.as_u16(), 401);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers).unwrap_err().status.as_u16(), 401);
    }

    #[test]
    fn test_bearer_token_present() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("coach").unwrap(), ActorRole::Coach);
        assert_eq!(parse_role("parent").unwrap_err().status.as_u16(), 404);
    }
}
