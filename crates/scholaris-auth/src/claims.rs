//! Access token payload.
//!
//! Every token carries the actor's row id and role. Actors that own a natural
//! key also carry it under a role-specific name: admins their `schoolID`,
//! students their `studentID`, teachers their `teacherID`. Coaches and
//! librarians have no natural key.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::roles::ActorRole;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Actor row id (UUID).
    pub id: String,
    pub role: ActorRole,
    #[serde(rename = "schoolID", default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
    #[serde(rename = "studentID", default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(rename = "teacherID", default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    /// Expiration (Unix timestamp).
    pub exp: usize,
    /// Issued at (Unix timestamp).
    pub iat: usize,
}

impl Claims {
    /// Places `natural_key` under the claim name matching `role`.
    pub fn new(
        id: String,
        role: ActorRole,
        natural_key: Option<&str>,
        iat: usize,
        exp: usize,
    ) -> Self {
        let key = natural_key.map(str::to_string);
        let (school_id, student_id, teacher_id) = match role {
            ActorRole::Admin => (key, None, None),
            ActorRole::Student => (None, key, None),
            ActorRole::Teacher => (None, None, key),
            ActorRole::Coach | ActorRole::Librarian => (None, None, None),
        };

        Self {
            id,
            role,
            school_id,
            student_id,
            teacher_id,
            exp,
            iat,
        }
    }

    pub fn natural_key(&self) -> Option<&str> {
        match self.role {
            ActorRole::Admin => self.school_id.as_deref(),
            ActorRole::Student => self.student_id.as_deref(),
            ActorRole::Teacher => self.teacher_id.as_deref(),
            ActorRole::Coach | ActorRole::Librarian => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_payload_shape() {
        let claims = Claims::new(
            "7d9f".to_string(),
            ActorRole::Student,
            Some("st010m4567"),
            100,
            200,
        );
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["id"], "7d9f");
        assert_eq!(json["role"], "student");
        assert_eq!(json["studentID"], "st010m4567");
        assert!(json.get("schoolID").is_none());
        assert!(json.get("teacherID").is_none());
    }

    #[test]
    fn test_coach_drops_natural_key() {
        let claims = Claims::new("c1".to_string(), ActorRole::Coach, Some("ignored"), 1, 2);
        assert_eq!(claims.natural_key(), None);

        let json = serde_json::to_value(&claims).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 4);
    }

    #[test]
    fn test_admin_natural_key_is_school() {
        let claims = Claims::new("a1".to_string(), ActorRole::Admin, Some("sch_001b"), 1, 2);
        assert_eq!(claims.natural_key(), Some("sch_001b"));
        assert_eq!(claims.school_id.as_deref(), Some("sch_001b"));
    }
}
