//! # Scholaris Models
//!
//! Domain models, the natural-key codec and DTOs for the Scholaris API.
//!
//! # Modules
//!
//! - [`codes`]: school, student and teacher natural keys
//! - [`permissions`]: admin roles and permission tables
//! - [`actor`]: the authenticated principal, one variant per account kind
//! - [`admins`], [`students`], [`teachers`], [`coaches`], [`librarians`]:
//!   account rows, registration bodies and insert values
//! - [`auth`]: login, password and status bodies
//! - [`ids`]: row id newtypes
//! - [`status`]: account lifecycle

pub mod actor;
pub mod admins;
pub mod auth;
pub mod coaches;
pub mod codes;
pub mod credentials;
pub mod ids;
pub mod librarians;
pub mod permissions;
pub mod status;
pub mod students;
pub mod teachers;

pub use actor::Actor;
pub use admins::{Admin, NewAdmin, RegisterAdminDto, UpdateAdminAccessDto};
pub use auth::{
    ChangePasswordRequest, Claims, LoginRequest, LoginResponse, MessageResponse,
    StatusUpdateRequest,
};
pub use coaches::{Coach, NewCoach, RegisterCoachDto};
pub use codes::{
    CodeError, MAX_SCHOOL_SEQUENCE, SchoolCode, SchoolType, StudentCode, TeacherCode,
    extract_school_code, generate_student_id, generate_teacher_id, is_valid_school_code,
    is_valid_student_code, is_valid_teacher_code, next_school_code,
};
pub use credentials::{Credentialed, normalize_email};
pub use ids::{AdminId, CoachId, LibrarianId, StudentId, TeacherId};
pub use librarians::{Librarian, NewLibrarian, RegisterLibrarianDto};
pub use permissions::{Action, AdminRole, PermissionTable, Resource, is_allowed};
pub use status::ActorStatus;
pub use students::{
    NewStudent, PaginatedStudentsResponse, PaginationMeta, RegisterStudentDto, Student,
    StudentQueryParams,
};
pub use teachers::{NewTeacher, RegisterTeacherDto, Teacher};
