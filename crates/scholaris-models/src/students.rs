//! Student accounts and the admin listing DTOs.

use chrono::{DateTime, Utc};
use scholaris_core::{AppError, PasswordHash};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::codes::{CodeError, SchoolCode, StudentCode};
use crate::credentials::{Credentialed, normalize_email};
use crate::ids::StudentId;
use crate::status::ActorStatus;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    #[sqlx(try_from = "String")]
    pub password: PasswordHash,
    pub nic: String,
    #[serde(rename = "schoolID")]
    pub school_code: SchoolCode,
    #[serde(rename = "studentID")]
    pub student_code: StudentCode,
    pub course_ids: Vec<Uuid>,
    pub sport_ids: Vec<Uuid>,
    pub status: ActorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credentialed for Student {
    fn password_hash(&self) -> &PasswordHash {
        &self.password
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 72))]
    pub password: String,
    #[validate(length(min = 4, max = 20))]
    #[schema(example = "901234567V")]
    pub nic: String,
    #[serde(rename = "schoolID")]
    pub school_id: SchoolCode,
    #[serde(default)]
    pub course_ids: Vec<Uuid>,
    #[serde(default)]
    pub sport_ids: Vec<Uuid>,
}

/// A student ready to insert, with its derived student ID and hashed password.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub password: PasswordHash,
    pub nic: String,
    pub school_code: SchoolCode,
    pub student_code: StudentCode,
    pub course_ids: Vec<Uuid>,
    pub sport_ids: Vec<Uuid>,
}

impl NewStudent {
    pub fn from_dto(dto: RegisterStudentDto) -> Result<Self, AppError> {
        let student_code =
            StudentCode::derive(&dto.school_id, &dto.nic).map_err(CodeError::into_app_error)?;
        let password = PasswordHash::from_plaintext(&dto.password)?;

        Ok(Self {
            name: dto.name,
            email: normalize_email(&dto.email),
            password,
            nic: dto.nic,
            school_code: dto.school_id,
            student_code,
            course_ids: dto.course_ids,
            sport_ids: dto.sport_ids,
        })
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentQueryParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Only honoured for super admins; other admins always see their own school.
    #[serde(rename = "schoolID")]
    #[param(value_type = Option<String>)]
    pub school_id: Option<SchoolCode>,
}

impl StudentQueryParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}
