use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Consultant,
    Client,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Consultant => "Consultant",
            UserRole::Client => "Client",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            UserRole::Admin => BadgeVariant::Destructive,
            UserRole::Consultant => BadgeVariant::Default,
            UserRole::Client => BadgeVariant::Secondary,
        }
    }
}

/// Database model for users; `id` is the identity provider's user id
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One establishment grant, joined with the establishment name
#[derive(Debug, Clone, FromRow)]
pub struct EstablishmentGrant {
    pub user_id: String,
    pub establishment_id: Uuid,
    pub establishment_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_presentation() {
        assert_eq!(UserRole::Admin.badge(), BadgeVariant::Destructive);
        assert_eq!(UserRole::Consultant.label(), "Consultant");
        assert_eq!(UserRole::Client.badge(), BadgeVariant::Secondary);
    }
}
