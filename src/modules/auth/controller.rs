use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use scholaris_core::{AppError, ErrorResponse};
use scholaris_models::{Actor, ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse};
use tracing::instrument;

use super::service::AuthService;
use crate::middleware::auth::{AuthActor, parse_role};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Login as an actor of the given role
#[utoipa::path(
    post,
    path = "/api/v1/auth/{role}/login",
    params(("role" = String, Path, description = "admin, student, teacher, coach or librarian")),
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials or inactive account", body = ErrorResponse),
        (status = 404, description = "Unknown role", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    Path(role): Path<String>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let role = parse_role(&role)?;
    let response = AuthService::login(&state.db, &state.jwt_config, role, dto).await?;
    Ok(Json(response))
}

/// Register an actor of the given role
///
/// Admin registration allocates a new school ID. Student and teacher
/// registration derives the member ID from `schoolID` and `nic`.
#[utoipa::path(
    post,
    path = "/api/v1/auth/{role}/register",
    params(("role" = String, Path, description = "admin, student, teacher, coach or librarian")),
    request_body(
        content = serde_json::Value,
        description = "RegisterAdminDto, RegisterStudentDto, RegisterTeacherDto, RegisterCoachDto or RegisterLibrarianDto, matching {role}"
    ),
    responses(
        (status = 201, description = "Actor registered", body = Actor),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Unknown role, or no admin owns schoolID", body = ErrorResponse),
        (status = 409, description = "Email or generated ID already exists, or school capacity reached", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    Path(role): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Actor>), AppError> {
    let role = parse_role(&role)?;
    let Json(body) = body.map_err(|rejection| {
        AppError::bad_request(anyhow::anyhow!("Invalid request body: {}", rejection.body_text()))
    })?;

    let actor = AuthService::register(&state.db, role, body).await?;
    Ok((StatusCode::CREATED, Json(actor)))
}

/// Current actor, reloaded from the database
#[utoipa::path(
    get,
    path = "/api/v1/auth/{role}/me",
    params(("role" = String, Path, description = "Role the token was issued for")),
    responses(
        (status = 200, description = "Authenticated actor", body = Actor),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Token role does not match", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn me(AuthActor(actor): AuthActor) -> Json<Actor> {
    Json(actor)
}

/// Change the current actor's password
#[utoipa::path(
    put,
    path = "/api/v1/auth/{role}/password",
    params(("role" = String, Path, description = "Role the token was issued for")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Current password is incorrect", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Token role does not match", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, actor, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    ValidatedJson(dto): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let changed = AuthService::change_password(&state.db, &actor, dto).await?;
    let message = if changed {
        "Password updated successfully"
    } else {
        "Password unchanged"
    };
    Ok(Json(MessageResponse::new(message)))
}
