use axum::extract::FromRequestParts;
use scholaris_core::AppError;
use scholaris_models::{Action, Actor, Admin, Resource, SchoolCode};
use tracing::warn;

use crate::metrics::track_authorization_check;

/// Resolves `(resource, action)` for the authenticated actor.
///
/// Non-admin actors are always denied.
pub fn check_permission(actor: &Actor, resource: Resource, action: Action) -> Result<&Admin, AppError> {
    let admin = actor
        .as_admin()
        .ok_or_else(|| AppError::forbidden("Access denied. Admin account required".to_string()))?;

    let allowed = admin.can(resource, action);
    track_authorization_check(allowed, resource);

    if !allowed {
        warn!(admin_id = %admin.id, role = %admin.role, %resource, %action, "Permission denied");
        return Err(AppError::forbidden(format!(
            "Access denied. Missing required permission: {}.{}",
            resource, action
        )));
    }

    Ok(admin)
}

/// The school an admin's data access is confined to. `None` for super
/// admins, who see every school.
pub fn school_scope(admin: &Admin) -> Result<Option<SchoolCode>, AppError> {
    if admin.is_super_admin() {
        return Ok(None);
    }
    admin
        .school_code
        .clone()
        .map(Some)
        .ok_or_else(|| AppError::forbidden("Admin is not assigned to a school".to_string()))
}

/// Defines an extractor that yields the authenticated [`Admin`] only when it
/// holds the given permission.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $resource:expr, $action:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub scholaris_models::Admin);

        impl<S> axum::extract::FromRequestParts<S> for $name
        where
            S: Send + Sync,
        {
            type Rejection = scholaris_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &S,
            ) -> Result<Self, Self::Rejection> {
                let $crate::middleware::auth::AuthActor(actor) =
                    <$crate::middleware::auth::AuthActor as axum::extract::FromRequestParts<S>>::from_request_parts(parts, state).await?;
                let admin =
                    $crate::middleware::permission::check_permission(&actor, $resource, $action)?;
                Ok($name(admin.clone()))
            }
        }
    };
}

require_permission!(RequireStudentsView, Resource::Students, Action::View);
require_permission!(RequireStudentsEdit, Resource::Students, Action::Edit);
require_permission!(RequireStudentsDelete, Resource::Students, Action::Delete);
require_permission!(RequireTeachersEdit, Resource::Teachers, Action::Edit);
require_permission!(RequireCoachesEdit, Resource::Coaches, Action::Edit);
require_permission!(RequireLibraryEdit, Resource::Library, Action::Edit);

/// Extractor admitting only `super_admin` accounts.
#[derive(Debug, Clone)]
pub struct RequireSuperAdmin(pub Admin);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let crate::middleware::auth::AuthActor(actor) =
            crate::middleware::auth::AuthActor::from_request_parts(parts, state).await?;

        match actor {
            Actor::Admin(admin) if admin.is_super_admin() => Ok(RequireSuperAdmin(admin)),
            _ => Err(AppError::forbidden(
                "Access denied. Only super admins can access this resource".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scholaris_core::PasswordHash;
    use scholaris_models::{
        ActorStatus, AdminId, AdminRole, Librarian, LibrarianId, PermissionTable,
    };
    use sqlx::types::Json;
    use uuid::Uuid;

    fn admin(role: AdminRole, permissions: PermissionTable) -> Actor {
        let now = Utc::now();
        Actor::Admin(Admin {
            id: AdminId(Uuid::new_v4()),
            name: "Admin".to_string(),
            email: "admin@school.test".to_string(),
            password: PasswordHash::from_stored("hash".to_string()),
            role,
            permissions: Json(permissions),
            school_code: Some(SchoolCode::new("sch_010m").unwrap()),
            school_name: Some("Royal".to_string()),
            status: ActorStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    #[test]
    fn test_moderator_cannot_delete_students() {
        let actor = admin(
            AdminRole::Moderator,
            PermissionTable::defaults_for(AdminRole::Moderator).with(
                Resource::Students,
                Action::Delete,
                false,
            ),
        );
        let err = check_permission(&actor, Resource::Students, Action::Delete).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
    }

    #[test]
    fn test_super_admin_ignores_table() {
        let actor = admin(
            AdminRole::SuperAdmin,
            PermissionTable::empty().with(Resource::Students, Action::Delete, false),
        );
        assert!(check_permission(&actor, Resource::Students, Action::Delete).is_ok());
    }

    #[test]
    fn test_non_admin_denied() {
        let now = Utc::now();
        let actor = Actor::Librarian(Librarian {
            id: LibrarianId(Uuid::new_v4()),
            name: "L".to_string(),
            email: "l@school.test".to_string(),
            password: PasswordHash::from_stored("hash".to_string()),
            status: ActorStatus::Active,
            created_at: now,
            updated_at: now,
        });
        let err = check_permission(&actor, Resource::Library, Action::View).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
    }
}
