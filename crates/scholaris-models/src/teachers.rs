use chrono::{DateTime, Utc};
use scholaris_core::{AppError, PasswordHash};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::codes::{CodeError, SchoolCode, TeacherCode};
use crate::credentials::{Credentialed, normalize_email};
use crate::ids::TeacherId;
use crate::status::ActorStatus;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    #[sqlx(try_from = "String")]
    pub password: PasswordHash,
    pub nic: String,
    #[serde(rename = "schoolID")]
    pub school_code: SchoolCode,
    #[serde(rename = "teacherID")]
    pub teacher_code: TeacherCode,
    pub course_ids: Vec<Uuid>,
    pub status: ActorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credentialed for Teacher {
    fn password_hash(&self) -> &PasswordHash {
        &self.password
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTeacherDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 72))]
    pub password: String,
    #[validate(length(min = 4, max = 20))]
    pub nic: String,
    #[serde(rename = "schoolID")]
    pub school_id: SchoolCode,
    #[serde(default)]
    pub course_ids: Vec<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub name: String,
    pub email: String,
    pub password: PasswordHash,
    pub nic: String,
    pub school_code: SchoolCode,
    pub teacher_code: TeacherCode,
    pub course_ids: Vec<Uuid>,
}

impl NewTeacher {
    pub fn from_dto(dto: RegisterTeacherDto) -> Result<Self, AppError> {
        let teacher_code =
            TeacherCode::derive(&dto.school_id, &dto.nic).map_err(CodeError::into_app_error)?;
        let password = PasswordHash::from_plaintext(&dto.password)?;

        Ok(Self {
            name: dto.name,
            email: normalize_email(&dto.email),
            password,
            nic: dto.nic,
            school_code: dto.school_id,
            teacher_code,
            course_ids: dto.course_ids,
        })
    }
}
