use scholaris_core::ErrorResponse;
use scholaris_models::{
    Action, Actor, ActorStatus, Admin, AdminRole, ChangePasswordRequest, Coach, Librarian,
    LoginRequest, LoginResponse, MessageResponse, PaginatedStudentsResponse, PaginationMeta,
    PermissionTable, RegisterAdminDto, RegisterCoachDto, RegisterLibrarianDto, RegisterStudentDto,
    RegisterTeacherDto, Resource, SchoolCode, SchoolType, StatusUpdateRequest, Student,
    StudentCode, Teacher, TeacherCode, UpdateAdminAccessDto,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::me,
        crate::modules::auth::controller::change_password,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::update_student_status,
        crate::modules::admins::controller::update_admin_access,
        crate::modules::admins::controller::update_teacher_status,
        crate::modules::admins::controller::update_coach_status,
        crate::modules::admins::controller::update_librarian_status,
    ),
    components(
        schemas(
            Actor,
            Admin,
            Student,
            Teacher,
            Coach,
            Librarian,
            ActorStatus,
            AdminRole,
            Resource,
            Action,
            PermissionTable,
            SchoolCode,
            StudentCode,
            TeacherCode,
            SchoolType,
            LoginRequest,
            LoginResponse,
            RegisterAdminDto,
            RegisterStudentDto,
            RegisterTeacherDto,
            RegisterCoachDto,
            RegisterLibrarianDto,
            ChangePasswordRequest,
            StatusUpdateRequest,
            UpdateAdminAccessDto,
            MessageResponse,
            PaginationMeta,
            PaginatedStudentsResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Per-role login, registration and profile"),
        (name = "Students", description = "Admin student management"),
        (name = "Admins", description = "Admin permissions and account status")
    ),
    info(
        title = "Scholaris API",
        version = "0.1.0",
        description = "Identity and permission service for a multi-role school management API.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
