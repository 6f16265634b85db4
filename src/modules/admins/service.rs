use anyhow::Context;
use scholaris_auth::ActorRole;
use scholaris_core::AppError;
use scholaris_models::{
    Actor, ActorStatus, Admin, AdminRole, NewAdmin, PermissionTable, SchoolCode, SchoolType,
    UpdateAdminAccessDto,
};
use sqlx::{PgConnection, PgPool, types::Json};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::middleware::permission::school_scope;
use crate::modules::actors::service::{ActorService, map_insert_error};
use crate::modules::schools::SchoolCodeService;

pub struct AdminService;

impl AdminService {
    async fn insert(
        conn: &mut PgConnection,
        admin: &NewAdmin,
        school_code: Option<&SchoolCode>,
    ) -> Result<Admin, AppError> {
        sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (name, email, password, role, permissions, school_code, school_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(admin.password.as_str())
        .bind(admin.role)
        .bind(Json(&admin.permissions))
        .bind(school_code)
        .bind(&admin.school_name)
        .fetch_one(conn)
        .await
        .map_err(|e| map_insert_error(e, "School ID"))
    }

    /// Allocates a school code and inserts its owning admin in one
    /// transaction, holding the school sequence lock throughout.
    #[instrument(skip(db, admin), fields(email = %admin.email))]
    pub async fn register_school_admin(
        db: &PgPool,
        admin: NewAdmin,
        school_type: SchoolType,
    ) -> Result<Admin, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to start transaction")
            .map_err(AppError::database)?;

        SchoolCodeService::lock_sequence(&mut tx).await?;
        let school_code = SchoolCodeService::generate_school_code(&mut tx, school_type).await?;
        let created = Self::insert(&mut tx, &admin, Some(&school_code)).await?;

        tx.commit()
            .await
            .context("Failed to commit admin registration")
            .map_err(AppError::database)?;

        info!(admin_id = %created.id, school_code = %school_code, "School admin registered");
        Ok(created)
    }

    /// Inserts a `super_admin`. These own no school.
    #[instrument(skip(db, admin), fields(email = %admin.email))]
    pub async fn create_super_admin(db: &PgPool, admin: NewAdmin) -> Result<Admin, AppError> {
        let mut conn = db
            .acquire()
            .await
            .context("Failed to acquire connection")
            .map_err(AppError::database)?;
        Self::insert(&mut conn, &admin, None).await
    }

    #[instrument(skip(db))]
    pub async fn get_admin(db: &PgPool, id: Uuid) -> Result<Admin, AppError> {
        sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch admin")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Admin not found")))
    }

    /// Replaces another admin's role and/or permission table.
    ///
    /// A role change without a table resets the table to that role's
    /// defaults. Super admins can be neither created nor modified here.
    #[instrument(skip(db, dto))]
    pub async fn update_access(
        db: &PgPool,
        target_id: Uuid,
        dto: UpdateAdminAccessDto,
    ) -> Result<Admin, AppError> {
        if dto.role.is_none() && dto.permissions.is_none() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Provide a role or a permissions table"
            )));
        }
        if dto.role == Some(AdminRole::SuperAdmin) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "The super_admin role cannot be granted"
            )));
        }
        if let Some(table) = &dto.permissions {
            let unknown = table.unknown_keys();
            if !unknown.is_empty() {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Unknown permission keys: {}",
                    unknown.join(", ")
                )));
            }
        }

        let target = Self::get_admin(db, target_id).await?;
        if target.is_super_admin() {
            return Err(AppError::forbidden(
                "Super admin accounts cannot be modified".to_string(),
            ));
        }

        let role = dto.role.unwrap_or(target.role);
        let permissions = match (dto.permissions, dto.role) {
            (Some(table), _) => table,
            (None, Some(role)) => PermissionTable::defaults_for(role),
            (None, None) => target.permissions.0,
        };

        let updated = sqlx::query_as::<_, Admin>(
            r#"
            UPDATE admins
            SET role = $1, permissions = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(role)
        .bind(Json(&permissions))
        .bind(target_id)
        .fetch_one(db)
        .await
        .context("Failed to update admin access")
        .map_err(AppError::database)?;

        info!(admin_id = %target_id, role = %role, "Admin access updated");
        Ok(updated)
    }

    /// Sets the status of a `role` account on behalf of `admin`. Students and
    /// teachers outside the admin's school are reported as not found.
    #[instrument(skip(db, admin), fields(admin_id = %admin.id))]
    pub async fn set_actor_status(
        db: &PgPool,
        admin: &Admin,
        role: ActorRole,
        id: Uuid,
        status: ActorStatus,
    ) -> Result<Actor, AppError> {
        let scope = match role {
            ActorRole::Student | ActorRole::Teacher => school_scope(admin)?,
            _ => None,
        };

        let actor = ActorService::update_status(db, role, id, status, scope.as_ref()).await?;
        info!(%role, actor_id = %id, %status, "Account status changed");
        Ok(actor)
    }
}
