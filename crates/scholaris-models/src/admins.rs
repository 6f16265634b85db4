//! Admin accounts.
//!
//! Public registration always creates an `admin` that owns a newly allocated
//! school. `super_admin` accounts are created from the CLI and own no school.

use chrono::{DateTime, Utc};
use scholaris_core::{AppError, PasswordHash};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use utoipa::ToSchema;
use validator::Validate;

use crate::codes::{CodeError, SchoolCode, SchoolType};
use crate::credentials::{Credentialed, normalize_email};
use crate::ids::AdminId;
use crate::permissions::{Action, AdminRole, PermissionTable, Resource, is_allowed};
use crate::status::ActorStatus;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: AdminId,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    #[sqlx(try_from = "String")]
    pub password: PasswordHash,
    pub role: AdminRole,
    #[schema(value_type = PermissionTable)]
    pub permissions: Json<PermissionTable>,
    #[serde(rename = "schoolID")]
    pub school_code: Option<SchoolCode>,
    pub school_name: Option<String>,
    pub status: ActorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    /// Resolves a permission against this admin's role and table.
    pub fn can(&self, resource: Resource, action: Action) -> bool {
        is_allowed(self.role, &self.permissions.0, resource, action)
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == AdminRole::SuperAdmin
    }
}

impl Credentialed for Admin {
    fn password_hash(&self) -> &PasswordHash {
        &self.password
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 72))]
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub school_name: String,
    /// `boys`, `girls` or `mixed`, case-insensitive.
    #[schema(example = "mixed")]
    pub school_type: String,
    /// `admin` (default) or `moderator`.
    #[serde(default)]
    pub role: Option<AdminRole>,
}

/// An admin ready to insert. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password: PasswordHash,
    pub role: AdminRole,
    pub permissions: PermissionTable,
    pub school_name: Option<String>,
}

impl NewAdmin {
    /// Builds a school-owning admin from a registration body.
    ///
    /// The school type and role are checked before the password is hashed.
    /// `super_admin` cannot be self-registered.
    pub fn school_owner(dto: RegisterAdminDto) -> Result<(Self, SchoolType), AppError> {
        let school_type: SchoolType = dto.school_type.parse().map_err(CodeError::into_app_error)?;
        let role = dto.role.unwrap_or(AdminRole::Admin);
        if role == AdminRole::SuperAdmin {
            return Err(AppError::forbidden(
                "super_admin accounts can only be created from the CLI".to_string(),
            ));
        }
        let password = PasswordHash::from_plaintext(&dto.password)?;

        Ok((
            Self {
                name: dto.name,
                email: normalize_email(&dto.email),
                password,
                role,
                permissions: PermissionTable::defaults_for(role),
                school_name: Some(dto.school_name),
            },
            school_type,
        ))
    }

    pub fn super_admin(name: String, email: String, plaintext: &str) -> Result<Self, AppError> {
        Ok(Self {
            name,
            email: normalize_email(&email),
            password: PasswordHash::from_plaintext(plaintext)?,
            role: AdminRole::SuperAdmin,
            permissions: PermissionTable::defaults_for(AdminRole::SuperAdmin),
            school_name: None,
        })
    }
}

/// Role and/or permission table replacement for an admin.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateAdminAccessDto {
    pub role: Option<AdminRole>,
    pub permissions: Option<PermissionTable>,
}
