use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;
use uuid::Uuid;

/// Account role matching the `user_role` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Plumber,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Plumber => write!(f, "plumber"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// The caller behind a request, resolved from an active session on every request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub session_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_plumber(&self) -> bool {
        self.role == UserRole::Plumber
    }

    /// Admins see everything; other users only what they own
    pub fn can_view_owned_by(&self, owner_id: Uuid) -> bool {
        self.is_admin() || self.id == owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            display_name: "Someone".to_string(),
            role,
        }
    }

    #[test]
    fn test_role_checks() {
        assert!(user(UserRole::Admin).is_admin());
        assert!(!user(UserRole::User).is_admin());
        assert!(user(UserRole::Plumber).is_plumber());
    }

    #[test]
    fn test_owner_visibility() {
        let owner = user(UserRole::User);
        let other = user(UserRole::User);
        let admin = user(UserRole::Admin);

        assert!(owner.can_view_owned_by(owner.id));
        assert!(!other.can_view_owned_by(owner.id));
        assert!(admin.can_view_owned_by(owner.id));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Plumber).unwrap(), "\"plumber\"");
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }
}
