use chrono::{DateTime, Utc};
use scholaris_core::{AppError, PasswordHash};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::credentials::{Credentialed, normalize_email};
use crate::ids::CoachId;
use crate::status::ActorStatus;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coach {
    pub id: CoachId,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    #[sqlx(try_from = "String")]
    pub password: PasswordHash,
    pub sport_ids: Vec<Uuid>,
    pub status: ActorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credentialed for Coach {
    fn password_hash(&self) -> &PasswordHash {
        &self.password
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCoachDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 72))]
    pub password: String,
    #[serde(default)]
    pub sport_ids: Vec<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewCoach {
    pub name: String,
    pub email: String,
    pub password: PasswordHash,
    pub sport_ids: Vec<Uuid>,
}

impl NewCoach {
    pub fn from_dto(dto: RegisterCoachDto) -> Result<Self, AppError> {
        Ok(Self {
            password: PasswordHash::from_plaintext(&dto.password)?,
            name: dto.name,
            email: normalize_email(&dto.email),
            sport_ids: dto.sport_ids,
        })
    }
}
