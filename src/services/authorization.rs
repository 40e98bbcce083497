//! Role and ownership checks shared by the services.
//!
//! The predicates are pure; the `require_*` helpers turn a failed predicate into
//! [`Error::Forbidden`] and never narrow results silently.

use crate::error::{Error, Result};
use crate::models::user::{Role, User};
use uuid::Uuid;

pub fn is_admin(actor: &User) -> bool {
    matches!(actor.role, Role::Admin)
}

/// A student acting on a record they own.
pub fn is_student_self(actor: &User, owner_id: Uuid) -> bool {
    matches!(actor.role, Role::Student) && actor.id == owner_id
}

pub fn is_admin_or_owner(actor: &User, creator_id: Uuid) -> bool {
    is_admin(actor) || actor.id == creator_id
}

pub fn is_admin_or_self(actor: &User, subject_id: Uuid) -> bool {
    is_admin(actor) || actor.id == subject_id
}

pub fn require_admin(actor: &User, message: &str) -> Result<()> {
    ensure(is_admin(actor), actor, message)
}

pub fn require_student(actor: &User, message: &str) -> Result<()> {
    ensure(matches!(actor.role, Role::Student), actor, message)
}

pub fn require_admin_or_owner(actor: &User, creator_id: Uuid, message: &str) -> Result<()> {
    ensure(is_admin_or_owner(actor, creator_id), actor, message)
}

pub fn require_admin_or_student_self(actor: &User, owner_id: Uuid, message: &str) -> Result<()> {
    ensure(
        is_admin(actor) || is_student_self(actor, owner_id),
        actor,
        message,
    )
}

pub fn require_admin_or_self(actor: &User, subject_id: Uuid, message: &str) -> Result<()> {
    ensure(is_admin_or_self(actor, subject_id), actor, message)
}

fn ensure(allowed: bool, actor: &User, message: &str) -> Result<()> {
    if allowed {
        return Ok(());
    }
    tracing::warn!(actor = %actor.id, role = %actor.role, "{}", message);
    Err(Error::Forbidden(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Someone".into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: String::new(),
            role,
            branch: None,
            year: None,
            cgpa: None,
            skills: Vec::new(),
            campus: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn student_self_access_requires_identity_and_role() {
        let student = user(Role::Student);
        let admin = user(Role::Admin);

        assert!(is_student_self(&student, student.id));
        assert!(!is_student_self(&student, Uuid::new_v4()));
        assert!(!is_student_self(&admin, admin.id));
    }

    #[test]
    fn owner_may_manage_without_admin_role() {
        let student = user(Role::Student);
        assert!(is_admin_or_owner(&student, student.id));
        assert!(!is_admin_or_owner(&student, Uuid::new_v4()));
        assert!(is_admin_or_owner(&user(Role::Admin), Uuid::new_v4()));
    }

    #[test]
    fn violations_are_forbidden() {
        let student = user(Role::Student);
        let err = require_admin(&student, "Only admins can update application status").unwrap_err();
        assert!(matches!(err, Error::Forbidden(msg) if msg.contains("Only admins")));
        assert!(require_student(&user(Role::Admin), "Only students can apply").is_err());
        assert!(require_admin_or_student_self(&student, student.id, "Not authorized").is_ok());
    }
}
