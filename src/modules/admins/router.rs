use axum::{
    Router,
    routing::{patch, put},
};

use super::controller::{
    update_admin_access, update_coach_status, update_librarian_status, update_teacher_status,
};
use crate::modules::students::init_students_router;
use crate::state::AppState;

/// Admin-only routes. The caller mounts these behind `require_admin`.
pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .nest("/students", init_students_router())
        .route("/teachers/{id}/status", patch(update_teacher_status))
        .route("/coaches/{id}/status", patch(update_coach_status))
        .route("/librarians/{id}/status", patch(update_librarian_status))
        .route("/admins/{id}/permissions", put(update_admin_access))
}
