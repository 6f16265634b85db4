//! Administrative commands run by `scholaris-cli`.

pub mod seeder;

use scholaris_core::AppError;
use scholaris_models::{Admin, NewAdmin};
use sqlx::PgPool;

use crate::modules::admins::AdminService;

/// Creates a `super_admin`. This is the only way such an account comes into
/// existence.
pub async fn create_super_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Admin, AppError> {
    if password.len() < 8 {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "Password must be at least 8 characters"
        )));
    }

    let admin = NewAdmin::super_admin(name.to_string(), email.to_string(), password)?;
    AdminService::create_super_admin(db, admin).await
}
