use axum::{
    Router,
    routing::{get, patch},
};

use crate::modules::students::controller::{
    delete_student, get_student, get_students, update_student_status,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students))
        .route("/{id}", get(get_student).delete(delete_student))
        .route("/{id}/status", patch(update_student_status))
}
