//! Admin roles and the per-admin permission table.
//!
//! A [`PermissionTable`] maps resource names to action names to a boolean.
//! Lookups never fail: a resource or action absent from the table is a
//! denial. `super_admin` accounts skip the table altogether.
//!
//! ```ignore
//! let table = PermissionTable::defaults_for(AdminRole::Moderator);
//! assert!(is_allowed(AdminRole::Moderator, &table, Resource::Students, Action::View));
//! assert!(!is_allowed(AdminRole::Moderator, &table, Resource::Students, Action::Delete));
//! assert!(is_allowed(AdminRole::SuperAdmin, &table, Resource::Students, Action::Delete));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{Database, Decode, Encode, Type, postgres::PgTypeInfo};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Students,
    Courses,
    Sports,
    Library,
    Attendance,
    Results,
    Coaches,
    Teachers,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Students,
        Resource::Courses,
        Resource::Sports,
        Resource::Library,
        Resource::Attendance,
        Resource::Results,
        Resource::Coaches,
        Resource::Teachers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Students => "students",
            Resource::Courses => "courses",
            Resource::Sports => "sports",
            Resource::Library => "library",
            Resource::Attendance => "attendance",
            Resource::Results => "results",
            Resource::Coaches => "coaches",
            Resource::Teachers => "teachers",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// AdminRole
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    Admin,
    Moderator,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::SuperAdmin => "super_admin",
            AdminRole::Admin => "admin",
            AdminRole::Moderator => "moderator",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(AdminRole::SuperAdmin),
            "admin" => Ok(AdminRole::Admin),
            "moderator" => Ok(AdminRole::Moderator),
            other => Err(format!("unknown admin role '{other}'")),
        }
    }
}

impl Type<sqlx::Postgres> for AdminRole {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for AdminRole {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode(self.as_str(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for AdminRole {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<'r, sqlx::Postgres>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}

// ============================================================================
// PermissionTable
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(
    value_type = Object,
    example = json!({"students": {"view": true, "create": true, "edit": true, "delete": false}})
)]
pub struct PermissionTable(BTreeMap<String, BTreeMap<String, bool>>);

impl PermissionTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table granted to a newly created admin of `role`.
    ///
    /// `admin` gets view, create and edit on every resource; `moderator` gets
    /// view only. `super_admin` gets an empty table.
    pub fn defaults_for(role: AdminRole) -> Self {
        let granted: &[Action] = match role {
            AdminRole::SuperAdmin => return Self::empty(),
            AdminRole::Admin => &[Action::View, Action::Create, Action::Edit],
            AdminRole::Moderator => &[Action::View],
        };

        let mut table = Self::empty();
        for resource in Resource::ALL {
            for action in Action::ALL {
                table.set(resource, action, granted.contains(&action));
            }
        }
        table
    }

    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        self.0
            .get(resource.as_str())
            .and_then(|actions| actions.get(action.as_str()))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, resource: Resource, action: Action, allowed: bool) {
        self.0
            .entry(resource.as_str().to_string())
            .or_default()
            .insert(action.as_str().to_string(), allowed);
    }

    pub fn with(mut self, resource: Resource, action: Action, allowed: bool) -> Self {
        self.set(resource, action, allowed);
        self
    }

    /// Keys that name no known resource or action, as `resource` or
    /// `resource.action`.
    pub fn unknown_keys(&self) -> Vec<String> {
        let mut unknown = Vec::new();
        for (resource, actions) in &self.0 {
            if !Resource::ALL.iter().any(|r| r.as_str() == resource) {
                unknown.push(resource.clone());
                continue;
            }
            for action in actions.keys() {
                if !Action::ALL.iter().any(|a| a.as_str() == action) {
                    unknown.push(format!("{resource}.{action}"));
                }
            }
        }
        unknown
    }
}

/// Decides whether an admin with `role` and `table` may perform `action` on
/// `resource`.
pub fn is_allowed(
    role: AdminRole,
    table: &PermissionTable,
    resource: Resource,
    action: Action,
) -> bool {
    role == AdminRole::SuperAdmin || table.allows(resource, action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_bypasses_empty_table() {
        let table = PermissionTable::empty();
        for resource in Resource::ALL {
            for action in Action::ALL {
                assert!(is_allowed(AdminRole::SuperAdmin, &table, resource, action));
            }
        }
    }

    #[test]
    fn test_super_admin_bypasses_explicit_denial() {
        let table = PermissionTable::empty().with(Resource::Students, Action::Delete, false);
        assert!(is_allowed(
            AdminRole::SuperAdmin,
            &table,
            Resource::Students,
            Action::Delete
        ));
    }

    #[test]
    fn test_moderator_denied_delete() {
        let table = PermissionTable::defaults_for(AdminRole::Moderator)
            .with(Resource::Students, Action::Delete, false);
        assert!(!is_allowed(
            AdminRole::Moderator,
            &table,
            Resource::Students,
            Action::Delete
        ));
        assert!(is_allowed(
            AdminRole::Moderator,
            &table,
            Resource::Students,
            Action::View
        ));
    }

    #[test]
    fn test_missing_keys_deny() {
        let table = PermissionTable::empty().with(Resource::Courses, Action::View, true);
        assert!(!table.allows(Resource::Sports, Action::View));
        assert!(!table.allows(Resource::Courses, Action::Edit));
        assert!(table.allows(Resource::Courses, Action::View));
    }

    #[test]
    fn test_admin_defaults() {
        let table = PermissionTable::defaults_for(AdminRole::Admin);
        for resource in Resource::ALL {
            assert!(table.allows(resource, Action::View));
            assert!(table.allows(resource, Action::Create));
            assert!(table.allows(resource, Action::Edit));
            assert!(!table.allows(resource, Action::Delete));
        }
    }

    #[test]
    fn test_json_shape() {
        let table = PermissionTable::empty().with(Resource::Library, Action::Edit, true);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, serde_json::json!({"library": {"edit": true}}));

        let parsed: PermissionTable =
            serde_json::from_value(serde_json::json!({"students": {"delete": true}})).unwrap();
        assert!(parsed.allows(Resource::Students, Action::Delete));
    }

    #[test]
    fn test_unknown_keys() {
        let parsed: PermissionTable = serde_json::from_value(serde_json::json!({
            "students": {"view": true, "archive": true},
            "parents": {"view": true}
        }))
        .unwrap();
        let unknown = parsed.unknown_keys();
        assert_eq!(unknown, vec!["parents".to_string(), "students.archive".to_string()]);
    }

    #[test]
    fn test_admin_role_strings() {
        assert_eq!(
            serde_json::to_string(&AdminRole::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
        assert_eq!("moderator".parse::<AdminRole>().unwrap(), AdminRole::Moderator);
        assert!("root".parse::<AdminRole>().is_err());
    }
}
