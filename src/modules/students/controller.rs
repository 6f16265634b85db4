use axum::{
    Json,
    extract::{Path, Query, State},
};
use scholaris_auth::ActorRole;
use scholaris_core::{AppError, ErrorResponse};
use scholaris_models::{
    Actor, MessageResponse, PaginatedStudentsResponse, PaginationMeta, StatusUpdateRequest,
    Student, StudentQueryParams,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::permission::{
    RequireStudentsDelete, RequireStudentsEdit, RequireStudentsView, school_scope,
};
use crate::modules::admins::AdminService;
use crate::modules::students::service::StudentService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/admin/students",
    params(StudentQueryParams),
    responses(
        (status = 200, description = "Paginated students", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing students.view", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn get_students(
    State(state): State<AppState>,
    RequireStudentsView(admin): RequireStudentsView,
    Query(params): Query<StudentQueryParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let scope = match school_scope(&admin)? {
        Some(own) => Some(own),
        None => params.school_id.clone(),
    };

    let limit = params.limit();
    let (students, total) =
        StudentService::list(&state.db, scope.as_ref(), limit, params.offset()).await?;

    Ok(Json(PaginatedStudentsResponse {
        data: students,
        meta: PaginationMeta {
            page: params.page(),
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/students/{id}",
    params(("id" = Uuid, Path, description = "Student row id")),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 403, description = "Missing students.view", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, admin))]
pub async fn get_student(
    State(state): State<AppState>,
    RequireStudentsView(admin): RequireStudentsView,
    Path(id): Path<Uuid>,
) -> Result<Json<Student>, AppError> {
    let scope = school_scope(&admin)?;
    let student = StudentService::get(&state.db, id, scope.as_ref()).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/students/{id}",
    params(("id" = Uuid, Path, description = "Student row id")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 403, description = "Missing students.delete", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete_student(
    State(state): State<AppState>,
    RequireStudentsDelete(admin): RequireStudentsDelete,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let scope = school_scope(&admin)?;
    StudentService::delete(&state.db, id, scope.as_ref()).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/students/{id}/status",
    params(("id" = Uuid, Path, description = "Student row id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Updated student", body = Actor),
        (status = 403, description = "Missing students.edit", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, admin, dto))]
pub async fn update_student_status(
    State(state): State<AppState>,
    RequireStudentsEdit(admin): RequireStudentsEdit,
    Path(id): Path<Uuid>,
    Json(dto): Json<StatusUpdateRequest>,
) -> Result<Json<Actor>, AppError> {
    let actor =
        AdminService::set_actor_status(&state.db, &admin, ActorRole::Student, id, dto.status)
            .await?;
    Ok(Json(actor))
}
