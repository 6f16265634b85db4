use axum::{
    Json,
    extract::{Path, State},
};
use scholaris_auth::ActorRole;
use scholaris_core::{AppError, ErrorResponse};
use scholaris_models::{Actor, Admin, StatusUpdateRequest, UpdateAdminAccessDto};
use tracing::instrument;
use uuid::Uuid;

use super::service::AdminService;
use crate::middleware::permission::{
    RequireCoachesEdit, RequireLibraryEdit, RequireSuperAdmin, RequireTeachersEdit,
};
use crate::state::AppState;

/// Replace another admin's role and/or permission table
#[utoipa::path(
    put,
    path = "/api/v1/admin/admins/{id}/permissions",
    params(("id" = Uuid, Path, description = "Admin row id")),
    request_body = UpdateAdminAccessDto,
    responses(
        (status = 200, description = "Updated admin", body = Admin),
        (status = 400, description = "Unknown permission keys or super_admin grant", body = ErrorResponse),
        (status = 403, description = "Caller is not a super admin, or target is one", body = ErrorResponse),
        (status = 404, description = "Admin not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admins"
)]
#[instrument(skip(state, caller, dto), fields(caller_id = %caller.id))]
pub async fn update_admin_access(
    State(state): State<AppState>,
    RequireSuperAdmin(caller): RequireSuperAdmin,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateAdminAccessDto>,
) -> Result<Json<Admin>, AppError> {
    let admin = AdminService::update_access(&state.db, id, dto).await?;
    Ok(Json(admin))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/teachers/{id}/status",
    params(("id" = Uuid, Path, description = "Teacher row id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Updated teacher", body = Actor),
        (status = 403, description = "Missing teachers.edit", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admins"
)]
#[instrument(skip(state, admin, dto))]
pub async fn update_teacher_status(
    State(state): State<AppState>,
    RequireTeachersEdit(admin): RequireTeachersEdit,
    Path(id): Path<Uuid>,
    Json(dto): Json<StatusUpdateRequest>,
) -> Result<Json<Actor>, AppError> {
    let actor =
        AdminService::set_actor_status(&state.db, &admin, ActorRole::Teacher, id, dto.status)
            .await?;
    Ok(Json(actor))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/coaches/{id}/status",
    params(("id" = Uuid, Path, description = "Coach row id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Updated coach", body = Actor),
        (status = 403, description = "Missing coaches.edit", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admins"
)]
#[instrument(skip(state, admin, dto))]
pub async fn update_coach_status(
    State(state): State<AppState>,
    RequireCoachesEdit(admin): RequireCoachesEdit,
    Path(id): Path<Uuid>,
    Json(dto): Json<StatusUpdateRequest>,
) -> Result<Json<Actor>, AppError> {
    let actor =
        AdminService::set_actor_status(&state.db, &admin, ActorRole::Coach, id, dto.status)
            .await?;
    Ok(Json(actor))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/librarians/{id}/status",
    params(("id" = Uuid, Path, description = "Librarian row id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Updated librarian", body = Actor),
        (status = 403, description = "Missing library.edit", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admins"
)]
#[instrument(skip(state, admin, dto))]
pub async fn update_librarian_status(
    State(state): State<AppState>,
    RequireLibraryEdit(admin): RequireLibraryEdit,
    Path(id): Path<Uuid>,
    Json(dto): Json<StatusUpdateRequest>,
) -> Result<Json<Actor>, AppError> {
    let actor =
        AdminService::set_actor_status(&state.db, &admin, ActorRole::Librarian, id, dto.status)
            .await?;
    Ok(Json(actor))
}
