use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_ADMIN, ROLE_CONSULTANT};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Identity provider subject; also the primary key of `users`
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Only present for interactive OIDC sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_uid: Option<String>,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    /// Admins and consultants may edit compliance data
    pub fn is_staff(&self) -> bool {
        self.is_admin() || self.has_role(ROLE_CONSULTANT)
    }
}

/// Claims namespace configured on the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomClaims {
    #[serde(default)]
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "u1".to_string(),
            email: None,
            session_uid: None,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_role_hierarchy() {
        let admin = user(&["admin"]);
        assert!(admin.is_admin());
        assert!(admin.is_staff());

        let consultant = user(&["consultant"]);
        assert!(!consultant.is_admin());
        assert!(consultant.is_staff());

        let client = user(&["client"]);
        assert!(!client.is_admin());
        assert!(!client.is_staff());
    }
}
