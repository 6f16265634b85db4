//! The authenticated principal.
//!
//! [`Actor`] is a tagged union over the five account kinds. It serializes
//! externally tagged by role, so a student renders as
//! `{"student": {...}}`, which is the shape login, registration and profile
//! responses use.

use scholaris_auth::ActorRole;
use scholaris_core::PasswordHash;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::admins::Admin;
use crate::coaches::Coach;
use crate::credentials::Credentialed;
use crate::librarians::Librarian;
use crate::status::ActorStatus;
use crate::students::Student;
use crate::teachers::Teacher;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    Admin(Admin),
    Student(Student),
    Teacher(Teacher),
    Coach(Coach),
    Librarian(Librarian),
}

impl Actor {
    pub fn role(&self) -> ActorRole {
        match self {
            Actor::Admin(_) => ActorRole::Admin,
            Actor::Student(_) => ActorRole::Student,
            Actor::Teacher(_) => ActorRole::Teacher,
            Actor::Coach(_) => ActorRole::Coach,
            Actor::Librarian(_) => ActorRole::Librarian,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Actor::Admin(a) => a.id.into_inner(),
            Actor::Student(s) => s.id.into_inner(),
            Actor::Teacher(t) => t.id.into_inner(),
            Actor::Coach(c) => c.id.into_inner(),
            Actor::Librarian(l) => l.id.into_inner(),
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Actor::Admin(a) => &a.email,
            Actor::Student(s) => &s.email,
            Actor::Teacher(t) => &t.email,
            Actor::Coach(c) => &c.email,
            Actor::Librarian(l) => &l.email,
        }
    }

    pub fn status(&self) -> ActorStatus {
        match self {
            Actor::Admin(a) => a.status,
            Actor::Student(s) => s.status,
            Actor::Teacher(t) => t.status,
            Actor::Coach(c) => c.status,
            Actor::Librarian(l) => l.status,
        }
    }

    /// The key carried in the token next to the row id: an admin's school,
    /// a student's or teacher's own code.
    pub fn natural_key(&self) -> Option<&str> {
        match self {
            Actor::Admin(a) => a.school_code.as_ref().map(|c| c.as_str()),
            Actor::Student(s) => Some(s.student_code.as_str()),
            Actor::Teacher(t) => Some(t.teacher_code.as_str()),
            Actor::Coach(_) | Actor::Librarian(_) => None,
        }
    }

    pub fn as_admin(&self) -> Option<&Admin> {
        match self {
            Actor::Admin(a) => Some(a),
            _ => None,
        }
    }
}

impl Credentialed for Actor {
    fn password_hash(&self) -> &PasswordHash {
        match self {
            Actor::Admin(a) => a.password_hash(),
            Actor::Student(s) => s.password_hash(),
            Actor::Teacher(t) => t.password_hash(),
            Actor::Coach(c) => c.password_hash(),
            Actor::Librarian(l) => l.password_hash(),
        }
    }
}

impl From<Admin> for Actor {
    fn from(admin: Admin) -> Self {
        Actor::Admin(admin)
    }
}

impl From<Student> for Actor {
    fn from(student: Student) -> Self {
        Actor::Student(student)
    }
}

impl From<Teacher> for Actor {
    fn from(teacher: Teacher) -> Self {
        Actor::Teacher(teacher)
    }
}

impl From<Coach> for Actor {
    fn from(coach: Coach) -> Self {
        Actor::Coach(coach)
    }
}

impl From<Librarian> for Actor {
    fn from(librarian: Librarian) -> Self {
        Actor::Librarian(librarian)
    }
}
