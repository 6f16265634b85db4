use anyhow::Context;
use scholaris_core::AppError;
use scholaris_models::{CodeError, SchoolCode, SchoolType, next_school_code};
use sqlx::PgConnection;
use tracing::{info, instrument};

use crate::metrics::track_school_code_allocated;

/// Transaction-scoped advisory lock key serializing school code allocation.
const SCHOOL_SEQUENCE_LOCK: i64 = 0x5343_484F_4F4C;

pub struct SchoolCodeService;

impl SchoolCodeService {
    /// Blocks until no other transaction is allocating a school code. The lock
    /// is released when the surrounding transaction ends.
    pub async fn lock_sequence(conn: &mut PgConnection) -> Result<(), AppError> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SCHOOL_SEQUENCE_LOCK)
            .execute(conn)
            .await
            .context("Failed to lock school sequence")
            .map_err(AppError::database)?;
        Ok(())
    }

    /// Greatest school code stored so far, across every school type.
    pub async fn current_max(conn: &mut PgConnection) -> Result<Option<SchoolCode>, AppError> {
        let code = sqlx::query_scalar::<_, SchoolCode>(
            r#"
            SELECT school_code
            FROM admins
            WHERE school_code ~ '^sch_[0-9]{3}[bgm]$'
            ORDER BY school_code DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(conn)
        .await
        .context("Failed to read latest school code")
        .map_err(AppError::database)?;

        Ok(code)
    }

    /// Allocates the next school code. Call [`Self::lock_sequence`] on the
    /// same transaction first.
    #[instrument(skip(conn))]
    pub async fn generate_school_code(
        conn: &mut PgConnection,
        school_type: SchoolType,
    ) -> Result<SchoolCode, AppError> {
        let current = Self::current_max(&mut *conn).await?;
        let code = next_school_code(school_type, current.as_ref())
            .map_err(CodeError::into_app_error)?;

        info!(school_code = %code, "Allocated school code");
        track_school_code_allocated(school_type);
        Ok(code)
    }
}
