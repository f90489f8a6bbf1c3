use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Teacher,
    Admin,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub username: Option<String>,
    pub role: Role,
    /// Schema-less bag; updates shallow-merge into it.
    pub metadata: serde_json::Value,
    pub created_at: OffsetDateTime,
    pub last_login_at: Option<OffsetDateTime>,
}

impl User {
    /// Role gate for an operation. Runs only once identity is established;
    /// a mismatch is a 403, never a 401.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            return Ok(());
        }
        Err(AppError::Forbidden("Insufficient privileges".into()))
    }

    /// Self-scoped operations: the actor must be the target user, unless the
    /// actor is an admin.
    pub fn require_self_or_admin(&self, target_id: i64) -> Result<(), AppError> {
        if self.id == target_id || self.role == Role::Admin {
            return Ok(());
        }
        Err(AppError::Forbidden(
            "Cannot act on another user's account".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(id: i64, role: Role) -> User {
        User {
            id,
            email: format!("u{}@example.com", id),
            password_hash: "x".into(),
            username: None,
            role,
            metadata: serde_json::json!({}),
            created_at: OffsetDateTime::now_utc(),
            last_login_at: None,
        }
    }

    #[test]
    fn require_role_accepts_member() {
        let admin = user_with_role(1, Role::Admin);
        assert!(admin.require_role(&[Role::Admin]).is_ok());
        assert!(admin.require_role(&[Role::Admin, Role::Teacher]).is_ok());

        let teacher = user_with_role(2, Role::Teacher);
        assert!(teacher.require_role(&[Role::Admin, Role::Teacher]).is_ok());
    }

    #[test]
    fn require_role_rejects_non_member_with_forbidden() {
        let user = user_with_role(3, Role::User);
        let err = user.require_role(&[Role::Admin, Role::Teacher]).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn self_scope_allows_own_account() {
        let user = user_with_role(5, Role::User);
        assert!(user.require_self_or_admin(5).is_ok());
    }

    #[test]
    fn self_scope_allows_admin_on_any_account() {
        let admin = user_with_role(1, Role::Admin);
        assert!(admin.require_self_or_admin(99).is_ok());
    }

    #[test]
    fn self_scope_rejects_other_accounts() {
        let teacher = user_with_role(2, Role::Teacher);
        let err = teacher.require_self_or_admin(3).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = user_with_role(1, Role::User);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(json.contains("u1@example.com"));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"admin\"").unwrap(),
            Role::Admin
        );
    }
}
