use chrono::{DateTime, Utc};
use scholaris_core::{AppError, PasswordHash};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::credentials::{Credentialed, normalize_email};
use crate::ids::LibrarianId;
use crate::status::ActorStatus;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Librarian {
    pub id: LibrarianId,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    #[sqlx(try_from = "String")]
    pub password: PasswordHash,
    pub status: ActorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credentialed for Librarian {
    fn password_hash(&self) -> &PasswordHash {
        &self.password
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterLibrarianDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 72))]
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct NewLibrarian {
    pub name: String,
    pub email: String,
    pub password: PasswordHash,
}

impl NewLibrarian {
    pub fn from_dto(dto: RegisterLibrarianDto) -> Result<Self, AppError> {
        Ok(Self {
            password: PasswordHash::from_plaintext(&dto.password)?,
            name: dto.name,
            email: normalize_email(&dto.email),
        })
    }
}
